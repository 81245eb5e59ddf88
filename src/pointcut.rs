use anyhow::{Context, Result};
use regex::Regex;

use crate::engine::ClassTable;

/// Injection position of a pointcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Position {
    Entry,
    Return,
    Call,
}

/// How a pointcut's target pattern is matched against candidate classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TargetKind {
    ByClassName,
    BySuperclass,
    ByInterface,
    ByAnnotation,
}

/// Parameter declared by the aspect method, fixed at scan time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AspectParam {
    None,
    JoinPoint,
    CallingPoint,
}

impl AspectParam {
    pub(crate) fn wants_point(self) -> bool {
        self != AspectParam::None
    }
}

/// Immutable record of one declared pointcut, produced by the scanner.
#[derive(Clone, Debug)]
pub(crate) struct PointcutDescriptor {
    pub(crate) aspect_class: String,
    pub(crate) aspect_method: String,
    pub(crate) aspect_descriptor: String,
    pub(crate) param: AspectParam,
    pub(crate) target_kind: TargetKind,
    pub(crate) target: Regex,
    pub(crate) fun_name: Regex,
    pub(crate) fun_desc: Regex,
    pub(crate) position: Position,
}

impl PointcutDescriptor {
    /// Does this pointcut apply to a method with the given name/descriptor?
    pub(crate) fn matches_method(&self, name: &str, descriptor: &str) -> bool {
        self.fun_name.is_match(name) && self.fun_desc.is_match(descriptor)
    }

    /// Does this Call-position pointcut match an invoked method's triple?
    pub(crate) fn matches_call(&self, owner: &str, name: &str, descriptor: &str) -> bool {
        self.target.is_match(owner) && self.matches_method(name, descriptor)
    }
}

/// Compile a pointcut pattern with full-match semantics: `"foo"` must not
/// match a method named `"foobar"`.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$"))
        .with_context(|| format!("invalid pointcut pattern: {pattern:?}"))
}

/// Accumulates descriptors during the scan phase; frozen into a
/// [`PointcutIndex`] before any modification begins.
#[derive(Debug, Default)]
pub(crate) struct PointcutIndexBuilder {
    by_class: Vec<PointcutDescriptor>,
    by_superclass: Vec<PointcutDescriptor>,
    by_interface: Vec<PointcutDescriptor>,
    by_annotation: Vec<PointcutDescriptor>,
    calls: Vec<PointcutDescriptor>,
}

impl PointcutIndexBuilder {
    pub(crate) fn new() -> Self {
        PointcutIndexBuilder::default()
    }

    /// Insert a descriptor, partitioning by position and target kind.
    /// Vec-backed sets keep discovery order, so application order across
    /// multiple matching descriptors is deterministic.
    pub(crate) fn add(&mut self, descriptor: PointcutDescriptor) {
        if descriptor.position == Position::Call {
            self.calls.push(descriptor);
            return;
        }
        match descriptor.target_kind {
            TargetKind::ByClassName => self.by_class.push(descriptor),
            TargetKind::BySuperclass => self.by_superclass.push(descriptor),
            TargetKind::ByInterface => self.by_interface.push(descriptor),
            TargetKind::ByAnnotation => self.by_annotation.push(descriptor),
        }
    }

    pub(crate) fn freeze(self) -> PointcutIndex {
        PointcutIndex {
            by_class: self.by_class,
            by_superclass: self.by_superclass,
            by_interface: self.by_interface,
            by_annotation: self.by_annotation,
            calls: self.calls,
        }
    }
}

/// Frozen pointcut sets, read-only during the modify phase.
#[derive(Debug)]
pub(crate) struct PointcutIndex {
    by_class: Vec<PointcutDescriptor>,
    by_superclass: Vec<PointcutDescriptor>,
    by_interface: Vec<PointcutDescriptor>,
    by_annotation: Vec<PointcutDescriptor>,
    calls: Vec<PointcutDescriptor>,
}

/// Cap on ancestor-chain walks. Valid hierarchies are acyclic, but corrupt
/// input must not send the matcher into an unbounded walk.
const MAX_HIERARCHY_DEPTH: usize = 64;

impl PointcutIndex {
    /// All Call-position descriptors; matched per invocation instruction,
    /// never per declaring class.
    pub(crate) fn call_pointcuts(&self) -> &[PointcutDescriptor] {
        &self.calls
    }

    /// Resolve the Entry/Return descriptors applicable to a class, walking the
    /// ancestor chain through the class table where the target kind asks for
    /// it. A chain that leaves the table (external/library superclass) simply
    /// ends the walk; the matches found so far stand.
    pub(crate) fn resolve_for_class<'a>(
        &'a self,
        class_name: &str,
        table: &ClassTable,
    ) -> Vec<&'a PointcutDescriptor> {
        let mut matched = Vec::new();
        for descriptor in &self.by_class {
            if descriptor.target.is_match(class_name) {
                matched.push(descriptor);
            }
        }
        for descriptor in &self.by_superclass {
            if matches_superclass(&descriptor.target, class_name, table) {
                matched.push(descriptor);
            }
        }
        for descriptor in &self.by_interface {
            if matches_interface(&descriptor.target, class_name, table) {
                matched.push(descriptor);
            }
        }
        for descriptor in &self.by_annotation {
            if matches_annotation(&descriptor.target, class_name, table) {
                matched.push(descriptor);
            }
        }
        matched
    }
}

fn matches_superclass(target: &Regex, class_name: &str, table: &ClassTable) -> bool {
    let mut current = table
        .lookup(class_name)
        .and_then(|meta| meta.super_name.clone());
    let mut depth = 0;
    while let Some(name) = current {
        if depth >= MAX_HIERARCHY_DEPTH {
            return false;
        }
        if target.is_match(&name) {
            return true;
        }
        current = table.lookup(&name).and_then(|meta| meta.super_name.clone());
        depth += 1;
    }
    false
}

fn matches_interface(target: &Regex, class_name: &str, table: &ClassTable) -> bool {
    let mut current = Some(class_name.to_string());
    let mut depth = 0;
    while let Some(name) = current {
        if depth >= MAX_HIERARCHY_DEPTH {
            return false;
        }
        let Some(meta) = table.lookup(&name) else {
            return false;
        };
        if meta.interfaces.iter().any(|itf| target.is_match(itf)) {
            return true;
        }
        current = meta.super_name.clone();
        depth += 1;
    }
    false
}

fn matches_annotation(target: &Regex, class_name: &str, table: &ClassTable) -> bool {
    table
        .lookup(class_name)
        .is_some_and(|meta| meta.annotation_types.iter().any(|ann| target.is_match(ann)))
}
