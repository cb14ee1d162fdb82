//! Format output dispatch helpers
//!
//! Provides a macro to eliminate repetitive format match blocks.

/// Dispatch output by format. The json branch returns a Result while the
/// human and records branches print and yield ().
///
/// ```rust,ignore
/// output_by_format_result!(cli.format,
///     json => print_json(&payload),
///     human => { print_human(&payload); },
///     records => { print_records(&payload); }
/// )?;
/// ```
#[macro_export]
macro_rules! output_by_format_result {
    ($format:expr, json => $json:expr, human => $human:block, records => $records:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
            $crate::cli::OutputFormat::Records => {
                $records;
                Ok(())
            }
        }
    };
}
