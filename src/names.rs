//! Well-known names of the aspect runtime contract.

/// Marker annotation on classes holding cross-cutting behavior.
pub(crate) const ASPECT_ANNOTATION: &str = "Lio/jweave/api/Aspect;";

/// Marker annotation on aspect methods declaring a pointcut.
pub(crate) const POINTCUT_ANNOTATION: &str = "Lio/jweave/api/Pointcut;";

/// Internal name of the join-point value class.
pub(crate) const JOIN_POINT_CLASS: &str = "io/jweave/api/JoinPoint";

/// Internal name of the call-site variant of the join-point value class.
pub(crate) const CALLING_POINT_CLASS: &str = "io/jweave/api/CallingPoint";

/// Constructor descriptor shared by JoinPoint and CallingPoint:
/// receiver (null for static methods) plus the boxed argument array.
pub(crate) const POINT_CTOR_DESCRIPTOR: &str = "(Ljava/lang/Object;[Ljava/lang/Object;)V";

/// Name of the synthesized singleton-holder field on aspect classes.
pub(crate) const SINGLETON_FIELD: &str = "INSTANCE";

pub(crate) const CONSTRUCTOR: &str = "<init>";
pub(crate) const CLASS_INITIALIZER: &str = "<clinit>";
pub(crate) const NO_ARG_VOID: &str = "()V";
pub(crate) const JAVA_OBJECT: &str = "java/lang/Object";

/// Field/parameter descriptor for a class internal name.
pub(crate) fn object_descriptor(class: &str) -> String {
    format!("L{class};")
}
