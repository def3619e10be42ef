use std::fmt;

/// Machine-readable error codes for fatal conditions surfaced to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ManifestReadFailed,
    ManifestParseError,
    PartitionParseError,
    DuplicatePath,
    InvalidPartition,
    ModuleCycle,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ManifestReadFailed => "E1002",
            Self::ManifestParseError => "E1003",
            Self::PartitionParseError => "E1004",
            Self::DuplicatePath => "E2001",
            Self::InvalidPartition => "E3001",
            Self::ModuleCycle => "E3002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ManifestReadFailed => "Schema manifest could not be read",
            Self::ManifestParseError => "Schema manifest parse error",
            Self::PartitionParseError => "Partition file parse error",
            Self::DuplicatePath => "Duplicate schema file path",
            Self::InvalidPartition => "Partition failed validation",
            Self::ModuleCycle => "Module dependency cycle",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in protomod.toml and retry."),
            Self::ManifestReadFailed => Some("Check the manifest path and read permissions."),
            Self::ManifestParseError => {
                Some("Each record needs a `path`; `namespace` and `imports` are optional.")
            }
            Self::PartitionParseError => {
                Some("Partition files use the JSON shape emitted by `protomod partition --json`.")
            }
            Self::DuplicatePath => Some("Each schema file path may appear only once."),
            Self::InvalidPartition => Some("Run `protomod validate` to list the violations."),
            Self::ModuleCycle => {
                Some("Move the shared definitions into a common namespace to break the cycle.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
