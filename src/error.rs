use std::path::PathBuf;
use thiserror::Error;

/// Fatal parse failures from either input grammar. Parsing either file is a
/// pure function of its text, so none of these are retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no module declaration found in netlist")]
    NoModuleFound,
    #[error("malformed port list: `{0}`")]
    MalformedPortList(String),
    #[error("no entity declaration found in testbench")]
    NoEntityFound,
    #[error("duplicate signal declaration: `{0}`")]
    DuplicateSignal(String),
}

/// Raised at generation time, after parsing and mapping succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("netlist port `{0}` has no matching testbench signal")]
    UnresolvedPort(String),
}

/// Terminal failure of a whole conversion, tagged with the file it arose
/// from. This is the only error type that crosses the public boundary.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{path}`")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("failed to bind DUT ports")]
    Binding(#[from] BindingError),
}
