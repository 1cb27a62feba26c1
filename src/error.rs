pub type IconResult<T> = Result<T, IconError>;

#[derive(thiserror::Error, Debug)]
pub enum IconError {
    #[error("config error: {0}")]
    Config(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("composition error: {0}")]
    Composition(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IconError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Prefix the error with the identity of the layer it belongs to,
    /// keeping the taxonomy class intact.
    pub fn for_layer(self, desc: &str) -> Self {
        match self {
            Self::Config(m) => Self::Config(format!("{desc}: {m}")),
            Self::Asset(m) => Self::Asset(format!("{desc}: {m}")),
            Self::Decode(m) => Self::Decode(format!("{desc}: {m}")),
            Self::Composition(m) => Self::Composition(format!("{desc}: {m}")),
            Self::Encode(m) => Self::Encode(format!("{desc}: {m}")),
            Self::Other(e) => Self::Other(e.context(desc.to_string())),
        }
    }
}
