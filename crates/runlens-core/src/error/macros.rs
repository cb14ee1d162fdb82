//! Error macros for runlens

/// Return an invalid report structure error for the node at `$path`
#[macro_export]
macro_rules! bail_invalid {
    ($path:expr, $reason:expr) => {
        return Err($crate::error::RunlensError::invalid_report($path, $reason))
    };
}

/// Return a usage error
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::RunlensError::UsageError($msg.to_string()))
    };
}
