use serde::Serialize;
use serde_json::Value;

use crate::error::SentaError;
use crate::response::ResponseEnvelope;

/// A value handed to `Context::send`, tagged by the producing unit
#[derive(Debug, Clone, PartialEq)]
pub enum SendValue {
    /// Written unchanged
    Text(String),
    /// Decimal text; wide enough for big integers
    Integer(i128),
    Float(f64),
    Bool(bool),
    /// Written as raw bytes
    Bytes(Vec<u8>),
    /// Headers applied, then the formatted body is sent
    Envelope(ResponseEnvelope),
    /// JSON-encoded (arrays and objects)
    Structured(Value),
    /// No value; sending it is an error
    Absent,
}

impl SendValue {
    /// Serialize any value into a `Structured` body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, SentaError> {
        Ok(Self::Structured(serde_json::to_value(value)?))
    }
}

/// Number text the way a JavaScript runtime prints it.
///
/// Plain decimal notation while the decimal exponent is in `-7..21`,
/// exponent notation (`1e+21`, `1.5e-7`) outside it.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // shortest round-trip digits, e.g. "1.2345e-7"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    // position of the decimal point relative to the digits
    let point = exponent + 1;
    let len = digits.len() as i32;

    let text = if len <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - len) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat(-point as usize))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", exponent.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", exponent.abs())
        }
    };

    if value < 0.0 { format!("-{text}") } else { text }
}

impl From<String> for SendValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SendValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&String> for SendValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SendValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(value as i128)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, isize, usize);

impl From<f32> for SendValue {
    fn from(value: f32) -> Self {
        Self::Float(value as f64)
    }
}

impl From<f64> for SendValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SendValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for SendValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for SendValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<ResponseEnvelope> for SendValue {
    fn from(value: ResponseEnvelope) -> Self {
        Self::Envelope(value)
    }
}

impl From<Value> for SendValue {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

impl From<()> for SendValue {
    fn from(_: ()) -> Self {
        Self::Absent
    }
}

impl<T: Into<SendValue>> From<Option<T>> for SendValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}
