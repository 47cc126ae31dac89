use crate::impl_lenient_deserialize;

/// Three-way switch used by the `strip_*` and `stderr` settings
///
/// `Yes`/`No` are explicit; `Smart` sits in between and is what any
/// unrecognized value falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    Yes,
    No,
    #[default]
    Smart,
}

impl_lenient_deserialize!(
    Policy,
    default = Smart,
    true => Yes,
    false => No,
    Yes => "yes",
    Yes => "always",
    Yes => "true",
    No => "no",
    No => "never",
    No => "false",
    Smart => "smart",
);

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Yes => "yes",
            Policy::No => "no",
            Policy::Smart => "smart",
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
