/// Returns early with [`Error::InvalidConfiguration`](crate::error::Error::InvalidConfiguration)
/// if a numerical value is not in the interval `[a,b]`
///
/// ### Example
/// ```ignore
/// let epsilon = 2.0;
/// ensure_interval!(epsilon, 0.0, 1.0);
/// ```
/// This returns the message "Invalid value for \`epsilon\`. Must be in the interval \[0, 1\]."
/// `NaN` is never in any interval.
#[macro_export]
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::InvalidConfiguration(format!(
                "Invalid value for `{}`. Must be in the interval [{}, {}].",
                stringify!($var),
                $a,
                $b,
            )));
        }
    };
}
