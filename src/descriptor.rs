use std::iter::Peekable;
use std::str::Chars;

use anyhow::{Context, Result};

use crate::ir::ValueKind;

/// Semantic type parsed from a JVM descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum JavaType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Object(String),
    Array(Box<JavaType>),
}

impl JavaType {
    /// Number of local-variable slots a value of this type occupies.
    pub(crate) fn width(&self) -> u16 {
        match self {
            JavaType::Long | JavaType::Double => 2,
            _ => 1,
        }
    }

    pub(crate) fn value_kind(&self) -> ValueKind {
        match self {
            JavaType::Boolean
            | JavaType::Byte
            | JavaType::Char
            | JavaType::Short
            | JavaType::Int => ValueKind::Int,
            JavaType::Long => ValueKind::Long,
            JavaType::Float => ValueKind::Float,
            JavaType::Double => ValueKind::Double,
            JavaType::Object(_) | JavaType::Array(_) => ValueKind::Ref,
        }
    }

    /// Boxing conversion for primitives: (wrapper class, `valueOf` descriptor).
    pub(crate) fn boxing(&self) -> Option<(&'static str, &'static str)> {
        match self {
            JavaType::Boolean => Some(("java/lang/Boolean", "(Z)Ljava/lang/Boolean;")),
            JavaType::Byte => Some(("java/lang/Byte", "(B)Ljava/lang/Byte;")),
            JavaType::Char => Some(("java/lang/Character", "(C)Ljava/lang/Character;")),
            JavaType::Short => Some(("java/lang/Short", "(S)Ljava/lang/Short;")),
            JavaType::Int => Some(("java/lang/Integer", "(I)Ljava/lang/Integer;")),
            JavaType::Long => Some(("java/lang/Long", "(J)Ljava/lang/Long;")),
            JavaType::Float => Some(("java/lang/Float", "(F)Ljava/lang/Float;")),
            JavaType::Double => Some(("java/lang/Double", "(D)Ljava/lang/Double;")),
            JavaType::Object(_) | JavaType::Array(_) => None,
        }
    }
}

/// Parsed method signature: argument types in order, return type (`None` = void).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MethodSig {
    pub(crate) args: Vec<JavaType>,
    pub(crate) ret: Option<JavaType>,
}

impl MethodSig {
    /// Width of the argument region in slots, receiver included for instance
    /// methods. This is the insertion boundary for synthesized locals.
    pub(crate) fn arg_region_width(&self, is_static: bool) -> u16 {
        let receiver = if is_static { 0 } else { 1 };
        receiver + self.args.iter().map(JavaType::width).sum::<u16>()
    }
}

/// Parse a method descriptor such as `(I[Ljava/lang/String;)V`.
///
/// A malformed descriptor is fatal: it means either a corrupt input class or
/// an engine bug, and no recovery is attempted.
pub(crate) fn parse_method_descriptor(descriptor: &str) -> Result<MethodSig> {
    let mut chars = descriptor.chars().peekable();
    if chars.next() != Some('(') {
        anyhow::bail!("malformed method descriptor: {descriptor:?}");
    }

    let mut args = Vec::new();
    loop {
        match chars.peek() {
            Some(')') => {
                chars.next();
                break;
            }
            Some(_) => args.push(parse_type(&mut chars, descriptor)?),
            None => anyhow::bail!("malformed method descriptor: {descriptor:?}"),
        }
    }

    let ret = match chars.peek() {
        Some('V') => {
            chars.next();
            None
        }
        Some(_) => Some(parse_type(&mut chars, descriptor)?),
        None => anyhow::bail!("malformed method descriptor: {descriptor:?}"),
    };

    if chars.next().is_some() {
        anyhow::bail!("trailing characters in method descriptor: {descriptor:?}");
    }
    Ok(MethodSig { args, ret })
}

fn parse_type(chars: &mut Peekable<Chars>, descriptor: &str) -> Result<JavaType> {
    let tag = chars
        .next()
        .with_context(|| format!("truncated descriptor: {descriptor:?}"))?;
    let parsed = match tag {
        'Z' => JavaType::Boolean,
        'B' => JavaType::Byte,
        'C' => JavaType::Char,
        'S' => JavaType::Short,
        'I' => JavaType::Int,
        'J' => JavaType::Long,
        'F' => JavaType::Float,
        'D' => JavaType::Double,
        '[' => JavaType::Array(Box::new(parse_type(chars, descriptor)?)),
        'L' => {
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some(';') => break,
                    Some(c) => name.push(c),
                    None => anyhow::bail!("unterminated class type in descriptor: {descriptor:?}"),
                }
            }
            JavaType::Object(name)
        }
        other => anyhow::bail!("unknown type tag {other:?} in descriptor: {descriptor:?}"),
    };
    Ok(parsed)
}
