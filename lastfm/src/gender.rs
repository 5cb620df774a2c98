use std::fmt::Display;

/// Gender as reported by the service, `"m"` or `"f"`, anything else is unknown
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Gender {
    Known(String),
    #[default]
    Unknown,
}

impl Gender {
    pub fn known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn male(&self) -> bool {
        matches!(self, Self::Known(s) if s == "m")
    }

    pub fn female(&self) -> bool {
        matches!(self, Self::Known(s) if s == "f")
    }
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "m" | "f" => Self::Known(s),
            _ => Self::Unknown,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.male() {
            write!(f, "Male")
        } else if self.female() {
            write!(f, "Female")
        } else {
            write!(f, "Neuter")
        }
    }
}
