use std::fmt;

/// Machine-readable error codes for scripted callers of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigReadFailed,
    GraphFileUnreadable,
    GraphJsonInvalid,
    MissingVertexCount,
    MalformedEdge,
    VertexOutOfRange,
    SourceOutOfRange,
    VertexCountTooLarge,
    CycleDetected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ConfigReadFailed => "E1002",
            Self::GraphFileUnreadable => "E2001",
            Self::GraphJsonInvalid => "E2002",
            Self::MissingVertexCount => "E2003",
            Self::MalformedEdge => "E2004",
            Self::VertexOutOfRange => "E2005",
            Self::SourceOutOfRange => "E2006",
            Self::VertexCountTooLarge => "E2007",
            Self::CycleDetected => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigReadFailed => "Config file could not be read",
            Self::GraphFileUnreadable => "Graph file could not be read",
            Self::GraphJsonInvalid => "Graph file is not valid JSON",
            Self::MissingVertexCount => "Vertex count missing and not inferable",
            Self::MalformedEdge => "Edge is missing an endpoint",
            Self::VertexOutOfRange => "Vertex index out of range",
            Self::SourceOutOfRange => "Source vertex out of range",
            Self::VertexCountTooLarge => "Vertex count exceeds the supported limit",
            Self::CycleDetected => "Graph is not a DAG",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in dagpath.toml and retry."),
            Self::ConfigReadFailed => Some("Check the --config path and its permissions."),
            Self::GraphFileUnreadable => Some("Check the graph path and its permissions."),
            Self::GraphJsonInvalid => None,
            Self::MissingVertexCount => Some("Add an `n` field or at least one edge."),
            Self::MalformedEdge => Some("Give every edge `u`/`v` or `from`/`to`."),
            Self::VertexOutOfRange => Some("Vertex indices must lie in [0, n)."),
            Self::SourceOutOfRange => Some("Pick a --source below the vertex count."),
            Self::VertexCountTooLarge => Some("Vertex ids must be dense indices starting at 0."),
            Self::CycleDetected => {
                Some("Run on the condensation (drop --raw) or remove the cycle.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
