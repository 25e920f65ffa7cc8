/// Implements the arithmetic shared by every vector arity.
///
/// `minus` is `plus` of the negation, and `Sub` delegates to it, so both
/// spellings round identically.
macro_rules! impl_vector {
    ($ty:ident { $first:ident $(, $rest:ident)* }) => {
        impl $ty {
            pub const ZERO: Self = Self { $first: 0.0 $(, $rest: 0.0)* };

            /// Component-wise sum.
            #[inline]
            pub fn plus(self, rhs: Self) -> Self {
                Self { $first: self.$first + rhs.$first $(, $rest: self.$rest + rhs.$rest)* }
            }

            /// `self + (-rhs)`.
            #[inline]
            pub fn minus(self, rhs: Self) -> Self {
                self.plus(-rhs)
            }

            /// Sum of component-wise products, accumulated in component order.
            #[inline]
            pub fn dot(self, rhs: Self) -> f32 {
                self.$first * rhs.$first $(+ self.$rest * rhs.$rest)*
            }

            #[inline]
            pub fn scale(self, s: f32) -> Self {
                Self { $first: self.$first * s $(, $rest: self.$rest * s)* }
            }

            #[inline]
            pub fn length(self) -> f32 {
                self.dot(self).sqrt()
            }

            /// Unit vector in the same direction. The zero vector (and anything
            /// whose length is not a positive finite number) maps to zero.
            #[inline]
            pub fn normalized(self) -> Self {
                let len = self.length();
                if len > 0.0 && len.is_finite() {
                    self.scale(1.0 / len)
                } else {
                    Self::ZERO
                }
            }

            #[inline]
            pub fn min(self, rhs: Self) -> Self {
                Self { $first: self.$first.min(rhs.$first) $(, $rest: self.$rest.min(rhs.$rest))* }
            }

            #[inline]
            pub fn max(self, rhs: Self) -> Self {
                Self { $first: self.$first.max(rhs.$first) $(, $rest: self.$rest.max(rhs.$rest))* }
            }

            #[inline]
            pub fn is_finite(self) -> bool {
                self.$first.is_finite() $(&& self.$rest.is_finite())*
            }
        }

        impl core::ops::Neg for $ty {
            type Output = $ty;
            #[inline]
            fn neg(self) -> $ty {
                $ty { $first: -self.$first $(, $rest: -self.$rest)* }
            }
        }

        impl core::ops::Add for $ty {
            type Output = $ty;
            #[inline]
            fn add(self, rhs: $ty) -> $ty {
                self.plus(rhs)
            }
        }

        impl core::ops::Sub for $ty {
            type Output = $ty;
            #[inline]
            fn sub(self, rhs: $ty) -> $ty {
                self.minus(rhs)
            }
        }

        impl core::ops::Mul<f32> for $ty {
            type Output = $ty;
            #[inline]
            fn mul(self, rhs: f32) -> $ty {
                self.scale(rhs)
            }
        }
    };
}
