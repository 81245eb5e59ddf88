use anyhow::{Context, Result};

use crate::descriptor::{JavaType, parse_method_descriptor};
use crate::ir::{Annotation, AnnotationValue, Class, Method};
use crate::names::{
    ASPECT_ANNOTATION, CALLING_POINT_CLASS, CLASS_INITIALIZER, CONSTRUCTOR, JOIN_POINT_CLASS,
    NO_ARG_VOID, POINTCUT_ANNOTATION,
};
use crate::pointcut::{AspectParam, PointcutDescriptor, Position, TargetKind, compile_pattern};

/// Extract every pointcut declared by an aspect class.
///
/// Classes without the aspect-marker annotation yield nothing. Constructors
/// and static initializers are never pointcut hosts. Any invalid declaration
/// is a fatal configuration error naming the offending class/method.
pub(crate) fn scan_aspect(class: &Class) -> Result<Vec<PointcutDescriptor>> {
    if find_annotation(&class.annotations, ASPECT_ANNOTATION).is_none() {
        return Ok(Vec::new());
    }
    let has_no_arg_ctor = class
        .methods
        .iter()
        .any(|m| m.name == CONSTRUCTOR && m.descriptor == NO_ARG_VOID);
    if !has_no_arg_ctor {
        anyhow::bail!(
            "aspect class {} must declare a no-argument constructor so its singleton can be instantiated",
            class.name
        );
    }

    let mut pointcuts = Vec::new();
    for method in &class.methods {
        if method.name == CONSTRUCTOR || method.name == CLASS_INITIALIZER {
            continue;
        }
        let Some(annotation) = find_annotation(&method.annotations, POINTCUT_ANNOTATION) else {
            continue;
        };
        pointcuts.push(parse_pointcut(class, method, annotation)?);
    }
    Ok(pointcuts)
}

pub(crate) fn find_annotation<'a>(
    annotations: &'a [Annotation],
    descriptor: &str,
) -> Option<&'a Annotation> {
    annotations.iter().find(|ann| ann.descriptor == descriptor)
}

fn parse_pointcut(
    class: &Class,
    method: &Method,
    annotation: &Annotation,
) -> Result<PointcutDescriptor> {
    let target_raw = string_element(class, method, annotation, "target")?;
    let (kind_raw, target_pattern) = target_raw.split_once(':').with_context(|| {
        format!(
            "pointcut target {:?} on {}.{} is missing its kind prefix (expected \"<kind>:<pattern>\")",
            target_raw, class.name, method.name
        )
    })?;
    let target_kind = match kind_raw {
        "class" => TargetKind::ByClassName,
        "superClass" => TargetKind::BySuperclass,
        "interface" => TargetKind::ByInterface,
        "annotation" => TargetKind::ByAnnotation,
        other => anyhow::bail!(
            "unknown target kind {:?} in pointcut target {:?} on {}.{} (expected class, superClass, interface, or annotation)",
            other,
            target_raw,
            class.name,
            method.name
        ),
    };

    let fun_name_raw = string_element(class, method, annotation, "funName")?;
    let fun_desc_raw = string_element(class, method, annotation, "funDesc")?;
    let position = position_element(class, method, annotation)?;
    let param = validate_shape(class, method, position)?;

    let pattern_context = || {
        format!(
            "in pointcut declared by {}.{}",
            class.name, method.name
        )
    };
    Ok(PointcutDescriptor {
        aspect_class: class.name.clone(),
        aspect_method: method.name.clone(),
        aspect_descriptor: method.descriptor.clone(),
        param,
        target_kind,
        target: compile_pattern(target_pattern).with_context(pattern_context)?,
        fun_name: compile_pattern(&fun_name_raw).with_context(pattern_context)?,
        fun_desc: compile_pattern(&fun_desc_raw).with_context(pattern_context)?,
        position,
    })
}

fn string_element(
    class: &Class,
    method: &Method,
    annotation: &Annotation,
    name: &str,
) -> Result<String> {
    match annotation.value(name) {
        Some(AnnotationValue::Str(value)) => Ok(value.clone()),
        Some(other) => anyhow::bail!(
            "pointcut element {name:?} on {}.{} must be a string, got {other:?}",
            class.name,
            method.name
        ),
        None => anyhow::bail!(
            "pointcut on {}.{} is missing its {name:?} element",
            class.name,
            method.name
        ),
    }
}

fn position_element(class: &Class, method: &Method, annotation: &Annotation) -> Result<Position> {
    let constant = match annotation.value("position") {
        Some(AnnotationValue::Enum { constant, .. }) => constant.as_str(),
        Some(AnnotationValue::Str(value)) => value.as_str(),
        None => anyhow::bail!(
            "pointcut on {}.{} is missing its \"position\" element",
            class.name,
            method.name
        ),
    };
    match constant {
        "ENTRY" => Ok(Position::Entry),
        "RETURN" => Ok(Position::Return),
        "CALL" => Ok(Position::Call),
        other => anyhow::bail!(
            "unknown pointcut position {:?} on {}.{} (expected ENTRY, RETURN, or CALL)",
            other,
            class.name,
            method.name
        ),
    }
}

/// Validate the aspect method's own shape against its declared position.
///
/// The method is invoked virtually on the singleton, so it must be a void
/// instance method; the allowed parameter lists depend on the position.
fn validate_shape(class: &Class, method: &Method, position: Position) -> Result<AspectParam> {
    if method.access.is_static {
        anyhow::bail!(
            "aspect method {}.{} must not be static: it is invoked on the aspect singleton",
            class.name,
            method.name
        );
    }
    let sig = parse_method_descriptor(&method.descriptor)
        .with_context(|| format!("aspect method {}.{}", class.name, method.name))?;
    if sig.ret.is_some() {
        anyhow::bail!(
            "aspect method {}.{}{} must return void: a return value would be left on the operand stack",
            class.name,
            method.name,
            method.descriptor
        );
    }

    let param = match sig.args.as_slice() {
        [] => Some(AspectParam::None),
        [JavaType::Object(name)] if name == JOIN_POINT_CLASS => Some(AspectParam::JoinPoint),
        [JavaType::Object(name)] if name == CALLING_POINT_CLASS && position == Position::Call => {
            Some(AspectParam::CallingPoint)
        }
        _ => None,
    };
    param.with_context(|| {
        let calling = if position == Position::Call {
            ", or exactly one CallingPoint parameter"
        } else {
            ""
        };
        format!(
            "aspect method {}.{}{} has an invalid parameter list for {position:?} advice; \
             allowed: no parameters, or exactly one JoinPoint parameter{calling}",
            class.name, method.name, method.descriptor
        )
    })
}
