use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::injector::inject_singleton;
use crate::ir::Class;
use crate::names::ASPECT_ANNOTATION;
use crate::pointcut::{PointcutIndex, PointcutIndexBuilder};
use crate::scanner::{find_annotation, scan_aspect};
use crate::weaver::weave_method;

/// Hierarchy metadata recorded for every scanned class.
#[derive(Clone, Debug)]
pub(crate) struct ClassMeta {
    pub(crate) super_name: Option<String>,
    pub(crate) interfaces: Vec<String>,
    /// Internal names of the class's annotation types.
    pub(crate) annotation_types: Vec<String>,
}

/// Read-only name-to-metadata lookup shared by the matcher and the weaver.
/// Populated during the scan phase, frozen before any modification begins.
#[derive(Debug, Default)]
pub(crate) struct ClassTable {
    classes: BTreeMap<String, ClassMeta>,
}

impl ClassTable {
    pub(crate) fn new() -> Self {
        ClassTable::default()
    }

    pub(crate) fn insert(&mut self, name: String, meta: ClassMeta) {
        self.classes.insert(name, meta);
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&ClassMeta> {
        self.classes.get(name)
    }
}

/// First phase of the weaving protocol: every class is scanned before any
/// class is modified. `seal` consumes the phase, so the type system rules out
/// scanning after modification has begun.
#[derive(Debug, Default)]
pub(crate) struct ScanPhase {
    table: ClassTable,
    index: PointcutIndexBuilder,
}

impl ScanPhase {
    pub(crate) fn new() -> Self {
        ScanPhase::default()
    }

    /// Record hierarchy metadata and extract pointcuts from aspect classes.
    pub(crate) fn scan(&mut self, class: &Class) -> Result<()> {
        let meta = ClassMeta {
            super_name: class.super_name.clone(),
            interfaces: class.interfaces.clone(),
            annotation_types: class
                .annotations
                .iter()
                .map(|ann| annotation_internal_name(&ann.descriptor))
                .collect(),
        };
        self.table.insert(class.name.clone(), meta);

        for descriptor in
            scan_aspect(class).with_context(|| format!("while scanning {}", class.name))?
        {
            self.index.add(descriptor);
        }
        Ok(())
    }

    /// Freeze the class table and pointcut index and move to the modify phase.
    pub(crate) fn seal(self) -> WeaveEngine {
        WeaveEngine {
            table: self.table,
            index: self.index.freeze(),
        }
    }
}

/// Per-class outcome of the modify phase, for reporting.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ClassSummary {
    pub(crate) singleton_injected: bool,
    pub(crate) woven_methods: usize,
    pub(crate) insertions: usize,
}

/// Second phase: read-only table and index, per-class in-place rewriting.
/// `modify` takes `&self`, so classes are independent of one another.
#[derive(Debug)]
pub(crate) struct WeaveEngine {
    table: ClassTable,
    index: PointcutIndex,
}

impl WeaveEngine {
    /// Rewrite one class: weave every method with code, then give aspect
    /// classes their singleton. Weaving precedes injection so a synthesized
    /// static initializer is never itself advised.
    pub(crate) fn modify(&self, class: &mut Class) -> Result<ClassSummary> {
        let mut summary = ClassSummary::default();
        let class_name = class.name.clone();
        let super_name = class.super_name.clone();

        let resolved = self.index.resolve_for_class(&class_name, &self.table);
        let call_pointcuts = self.index.call_pointcuts();
        for method in &mut class.methods {
            let method_summary = weave_method(
                &class_name,
                super_name.as_deref(),
                method,
                &resolved,
                call_pointcuts,
            )
            .with_context(|| format!("while weaving {}.{}", class_name, method.name))?;
            if method_summary.insertions > 0 {
                summary.woven_methods += 1;
                summary.insertions += method_summary.insertions;
            }
        }

        if find_annotation(&class.annotations, ASPECT_ANNOTATION).is_some() {
            inject_singleton(class)?;
            summary.singleton_injected = true;
        }
        Ok(summary)
    }
}

fn annotation_internal_name(descriptor: &str) -> String {
    descriptor
        .strip_prefix('L')
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap_or(descriptor)
        .to_string()
}
