/// A recognized `.obj` line keyword.
///
/// Every keyword outside this set maps to [`Directive::Unrecognized`] and the
/// line is skipped, which keeps the reader forward-compatible with files that
/// use parts of the format lumen does not model (`g`, `s`, `l`, curves, ...).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Directive {
    /// `v x y z [w]`
    Vertex,
    /// `vn x y z`
    Normal,
    /// `vt u [v [w]]`
    TexCoord,
    /// `f v[/vt][/vn] ...`
    Face,
    /// `o name`
    Object,
    /// `mtllib file...`
    MaterialLibrary,
    /// `usemtl name`
    UseMaterial,
    Unrecognized,
}

impl Directive {
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "v" => Self::Vertex,
            "vn" => Self::Normal,
            "vt" => Self::TexCoord,
            "f" => Self::Face,
            "o" => Self::Object,
            "mtllib" => Self::MaterialLibrary,
            "usemtl" => Self::UseMaterial,
            _ => Self::Unrecognized,
        }
    }

    /// Canonical keyword, used in diagnostics.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Vertex => "v",
            Self::Normal => "vn",
            Self::TexCoord => "vt",
            Self::Face => "f",
            Self::Object => "o",
            Self::MaterialLibrary => "mtllib",
            Self::UseMaterial => "usemtl",
            Self::Unrecognized => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        let all = [
            Directive::Vertex,
            Directive::Normal,
            Directive::TexCoord,
            Directive::Face,
            Directive::Object,
            Directive::MaterialLibrary,
            Directive::UseMaterial,
        ];
        for d in all {
            assert_eq!(Directive::from_keyword(d.keyword()), d);
        }
    }

    #[test]
    fn unknown_and_case_mismatch_are_unrecognized() {
        assert_eq!(Directive::from_keyword("g"), Directive::Unrecognized);
        assert_eq!(Directive::from_keyword("#"), Directive::Unrecognized);
        assert_eq!(Directive::from_keyword("V"), Directive::Unrecognized);
    }
}
