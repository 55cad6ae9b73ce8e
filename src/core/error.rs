use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationInvalidArgument,

    MappingNotFound,
    MappingInvalidLine,
    MappingDuplicateKey,

    RenameSourceMissing,
    RenameCollision,

    EncodingInvalidText,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::MappingNotFound => "mapping.not_found",
            ErrorCode::MappingInvalidLine => "mapping.invalid_line",
            ErrorCode::MappingDuplicateKey => "mapping.duplicate_key",

            ErrorCode::RenameSourceMissing => "rename.source_missing",
            ErrorCode::RenameCollision => "rename.collision",

            ErrorCode::EncodingInvalidText => "encoding.invalid_text",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingNotFoundDetails {
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingInvalidLineDetails {
    pub source: String,
    pub line: usize,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDuplicateKeyDetails {
    pub source: String,
    pub key: String,
    pub first_line: usize,
    pub duplicate_line: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameDetails {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = to_details(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn mapping_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::MappingNotFound,
            format!("Mapping file not found: {}", path),
            to_details(MappingNotFoundDetails { path }),
        )
        .with_hint("Pass --mapping <file> or run from the directory containing IDMapping.csv")
    }

    pub fn mapping_invalid_line(
        source: impl Into<String>,
        line: usize,
        problem: impl Into<String>,
    ) -> Self {
        let problem = problem.into();
        Self::new(
            ErrorCode::MappingInvalidLine,
            format!("Invalid mapping line {}: {}", line, problem),
            to_details(MappingInvalidLineDetails {
                source: source.into(),
                line,
                problem,
            }),
        )
    }

    pub fn mapping_duplicate_key(
        source: impl Into<String>,
        key: impl Into<String>,
        first_line: usize,
        duplicate_line: usize,
    ) -> Self {
        let key = key.into();
        Self::new(
            ErrorCode::MappingDuplicateKey,
            format!(
                "Duplicate mapping key '{}' at line {} (first at line {})",
                key, duplicate_line, first_line
            ),
            to_details(MappingDuplicateKeyDetails {
                source: source.into(),
                key,
                first_line,
                duplicate_line,
            }),
        )
        .with_hint("Each key may appear only once in the mapping file")
    }

    pub fn rename_source_missing(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        Self::new(
            ErrorCode::RenameSourceMissing,
            format!("Rename source no longer exists: {}", from),
            to_details(RenameDetails { from, to: to.into() }),
        )
    }

    pub fn rename_collision(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self::new(
            ErrorCode::RenameCollision,
            format!("Rename target '{}' already exists (from '{}')", to, from),
            to_details(RenameDetails { from, to }),
        )
        .with_hint("Remove or rename the existing entry, then rerun")
    }

    pub fn encoding_invalid_text(path: impl Into<String>, error: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::EncodingInvalidText,
            format!("Not valid UTF-8 text: {}", path),
            to_details(EncodingDetails {
                path,
                error: error.into(),
            }),
        )
        .with_hint("Use --skip-non-text to leave binary files untouched")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
