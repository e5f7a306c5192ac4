// ctxlog/src/macros/mod.rs
//
// Macros for building key/value sequences

/// Build a [`KeyVals`](crate::types::KeyVals) sequence.
///
/// Accepts either `key => value` pairs or a flat list of alternating keys and
/// values. The flat form takes anything convertible to
/// [`ValueType`](crate::types::ValueType), including odd-length lists and
/// non-string keys, which the logger normalizes when rendering.
///
/// # Examples
///
/// ```
/// use ctxlog::keyvals;
///
/// let kv = keyvals! {
///     "req_id" => "r1",
///     "attempt" => 2,
/// };
/// assert_eq!(kv.len(), 4);
///
/// // Flat form, trailing key without a value
/// let flat = keyvals!["user", "alice", "dangling"];
/// let (keys, vals) = flat.parse();
/// assert_eq!(keys, vec!["user", "dangling"]);
/// assert!(vals[1].is_null());
///
/// let empty = keyvals![];
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! keyvals {
    () => {
        $crate::types::KeyVals::new()
    };

    // Key => value pairs
    { $($key:expr => $value:expr),* $(,)? } => {
        {
            let mut kv = $crate::types::KeyVals::new();
            $(
                kv.push($key, $value);
            )*
            kv
        }
    };

    // Flat alternating list
    [ $($item:expr),* $(,)? ] => {
        {
            let items: Vec<$crate::types::ValueType> = vec![
                $( $crate::types::ValueType::from($item) ),*
            ];
            $crate::types::KeyVals::from(items)
        }
    };
}
