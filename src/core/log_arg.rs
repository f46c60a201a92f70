//! Positional arguments for message templates
//!
//! Call sites hand the logger [`LogArg`]s. An argument is either a plain
//! value or an absent optional; [`sanitize`] turns absent optionals into
//! sentinels so a missing value never breaks a log line:
//!
//! - absent numeric optionals become `0`
//! - any other absent optional becomes the string `"nil"`
//! - present optionals are formatted as their underlying value

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Sentinel for absent non-numeric arguments
pub const NIL: &str = "nil";

/// Plain value handed to the template formatter
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float(f64),
    Bool(bool),
}

impl ArgValue {
    /// Short type name used in formatting error markers
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Str(_) => "string",
            ArgValue::Int(_) => "int",
            ArgValue::Uint(_) => "uint",
            ArgValue::Float32(_) => "float32",
            ArgValue::Float(_) => "float64",
            ArgValue::Bool(_) => "bool",
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Str(s) => f.write_str(s),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Uint(u) => write!(f, "{}", u),
            ArgValue::Float32(v) => write!(f, "{}", v),
            ArgValue::Float(v) => write!(f, "{}", v),
            ArgValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Which sentinel an absent value is replaced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Numeric,
    Text,
}

impl ArgKind {
    /// Sentinel substituted for an absent value of this kind
    pub fn sentinel(self) -> ArgValue {
        match self {
            ArgKind::Numeric => ArgValue::Int(0),
            ArgKind::Text => ArgValue::Str(NIL.to_string()),
        }
    }
}

/// Argument as supplied by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum LogArg {
    Value(ArgValue),
    Absent(ArgKind),
}

impl LogArg {
    /// Wrap any `Display` value as a string argument
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        LogArg::Value(ArgValue::Str(value.to_string()))
    }
}

impl From<ArgValue> for LogArg {
    fn from(value: ArgValue) -> Self {
        LogArg::Value(value)
    }
}

/// Replace absent arguments with their sentinels.
pub fn sanitize(args: &[LogArg]) -> Vec<ArgValue> {
    args.iter()
        .map(|arg| match arg {
            LogArg::Value(value) => value.clone(),
            LogArg::Absent(kind) => kind.sentinel(),
        })
        .collect()
}

/// Conversion from call-site values into [`LogArg`]
pub trait ToLogArg {
    /// Sentinel kind used when an `Option` of this type is `None`
    const KIND: ArgKind;

    fn to_log_arg(&self) -> LogArg;
}

macro_rules! impl_to_log_arg {
    ($variant:ident as $target:ty, $kind:expr; $($t:ty),+) => {
        $(
            impl ToLogArg for $t {
                const KIND: ArgKind = $kind;

                #[inline]
                fn to_log_arg(&self) -> LogArg {
                    LogArg::Value(ArgValue::$variant(*self as $target))
                }
            }
        )+
    };
}

impl_to_log_arg!(Int as i64, ArgKind::Numeric; i8, i16, i32, i64, isize);
impl_to_log_arg!(Uint as u64, ArgKind::Numeric; u8, u16, u32, u64, usize);
impl_to_log_arg!(Float32 as f32, ArgKind::Numeric; f32);
impl_to_log_arg!(Float as f64, ArgKind::Numeric; f64);

impl ToLogArg for bool {
    const KIND: ArgKind = ArgKind::Text;

    fn to_log_arg(&self) -> LogArg {
        LogArg::Value(ArgValue::Bool(*self))
    }
}

impl ToLogArg for char {
    const KIND: ArgKind = ArgKind::Text;

    fn to_log_arg(&self) -> LogArg {
        LogArg::Value(ArgValue::Str(self.to_string()))
    }
}

impl ToLogArg for str {
    const KIND: ArgKind = ArgKind::Text;

    fn to_log_arg(&self) -> LogArg {
        LogArg::Value(ArgValue::Str(self.to_owned()))
    }
}

impl ToLogArg for String {
    const KIND: ArgKind = ArgKind::Text;

    fn to_log_arg(&self) -> LogArg {
        LogArg::Value(ArgValue::Str(self.clone()))
    }
}

impl ToLogArg for Cow<'_, str> {
    const KIND: ArgKind = ArgKind::Text;

    fn to_log_arg(&self) -> LogArg {
        LogArg::Value(ArgValue::Str(self.to_string()))
    }
}

impl ToLogArg for LogArg {
    const KIND: ArgKind = ArgKind::Text;

    fn to_log_arg(&self) -> LogArg {
        self.clone()
    }
}

impl<T: ToLogArg> ToLogArg for Option<T> {
    const KIND: ArgKind = T::KIND;

    fn to_log_arg(&self) -> LogArg {
        match self {
            Some(value) => value.to_log_arg(),
            None => LogArg::Absent(T::KIND),
        }
    }
}

impl<T: ToLogArg + ?Sized> ToLogArg for &T {
    const KIND: ArgKind = T::KIND;

    fn to_log_arg(&self) -> LogArg {
        (**self).to_log_arg()
    }
}

impl<T: ToLogArg + ?Sized> ToLogArg for &mut T {
    const KIND: ArgKind = T::KIND;

    fn to_log_arg(&self) -> LogArg {
        (**self).to_log_arg()
    }
}

impl<T: ToLogArg + ?Sized> ToLogArg for Box<T> {
    const KIND: ArgKind = T::KIND;

    fn to_log_arg(&self) -> LogArg {
        (**self).to_log_arg()
    }
}

impl<T: ToLogArg + ?Sized> ToLogArg for Rc<T> {
    const KIND: ArgKind = T::KIND;

    fn to_log_arg(&self) -> LogArg {
        (**self).to_log_arg()
    }
}

impl<T: ToLogArg + ?Sized> ToLogArg for Arc<T> {
    const KIND: ArgKind = T::KIND;

    fn to_log_arg(&self) -> LogArg {
        (**self).to_log_arg()
    }
}
