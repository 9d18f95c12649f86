use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no `{kind}` supplied and ${var} is not set; pass the {kind} directly or export ${var}"
    )]
    MissingCredential { kind: &'static str, var: &'static str },
}
