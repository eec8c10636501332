/// Builds call-time [`crate::Parameters`] from `name => value` pairs.
/// Values are converted with [`Into<crate::Value>`].
///
/// ```
/// use autowire::{params, Value};
///
/// let parameters = params! { "host" => "localhost", "port" => 8080 };
/// assert_eq!(parameters["port"], Value::Int(8080));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Parameters::new()
    };
    ( $( $name:expr => $value:expr ),+ $(,)? ) => {{
        let mut parameters = $crate::Parameters::new();
        $(
            parameters.insert(::core::convert::Into::into($name), $crate::Value::from($value));
        )+
        parameters
    }};
}
