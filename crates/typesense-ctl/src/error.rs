use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read {}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid desired config in {}", path.display())]
    Desired {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode output")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] typesense_cluster::Error),
}

impl CliError {
    /// 1 for remote failures, 2 for bad input or configuration, 3 when a
    /// cluster was left behind.
    pub fn exit_code(&self) -> u8 {
        use typesense_cluster::Error as E;

        match self {
            CliError::Input { .. } | CliError::Desired { .. } => 2,
            CliError::Engine(E::MissingEnv(_) | E::InvalidConfig(_)) => 2,
            CliError::Engine(e) if e.orphaned_id().is_some() => 3,
            CliError::Engine(_) | CliError::Output(_) => 1,
        }
    }

    /// State worth keeping despite the failure: a cluster that was created
    /// but never confirmed provisioned.
    pub fn partial_state(&self) -> Option<serde_json::Value> {
        match self {
            CliError::Engine(e) => e
                .orphaned_id()
                .map(|id| serde_json::json!({ "id": id, "tainted": true })),
            _ => None,
        }
    }
}

/// The error and each of its causes, joined with `: `.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        out.push_str(": ");
        out.push_str(&e.to_string());
        cause = e.source();
    }
    out
}
