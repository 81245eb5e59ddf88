use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Intermediate representation for a JVM class as handed over by the class-file frontend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Class {
    pub(crate) name: String,
    pub(crate) super_name: Option<String>,
    pub(crate) interfaces: Vec<String>,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) fields: Vec<Field>,
    pub(crate) methods: Vec<Method>,
}

/// Intermediate representation for a field declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Field {
    pub(crate) name: String,
    pub(crate) descriptor: String,
    pub(crate) access: FieldAccess,
}

/// Field access flags relevant to singleton injection.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct FieldAccess {
    pub(crate) is_public: bool,
    pub(crate) is_static: bool,
    pub(crate) is_final: bool,
}

/// Intermediate representation for a method and its instruction stream.
///
/// `code` is absent for abstract and native methods.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Method {
    pub(crate) name: String,
    pub(crate) descriptor: String,
    pub(crate) access: MethodAccess,
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) code: Option<InsnList>,
}

/// Method access flags used for weaving decisions.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub(crate) struct MethodAccess {
    pub(crate) is_public: bool,
    pub(crate) is_static: bool,
    pub(crate) is_abstract: bool,
}

/// A runtime-visible annotation use with its named element values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Annotation {
    pub(crate) descriptor: String,
    pub(crate) values: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    pub(crate) fn value(&self, name: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Annotation element value kinds the weaver consumes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) enum AnnotationValue {
    Str(String),
    Enum { descriptor: String, constant: String },
}

/// Stable identity of an instruction node within one method's stream.
///
/// Identities survive insertion, so jump targets and insertion points recorded
/// before a mutation remain valid afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub(crate) struct InsnId(pub(crate) u32);

/// One instruction node: stable id plus typed payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct Insn {
    pub(crate) id: InsnId,
    pub(crate) kind: InsnKind,
}

/// Operand/value category of a local-variable access or a return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum ValueKind {
    Int,
    Long,
    Float,
    Double,
    Ref,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum VarOp {
    Load,
    Store,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum InvokeKind {
    Virtual,
    Special,
    Static,
    Interface,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum FieldOp {
    GetStatic,
    PutStatic,
    GetField,
    PutField,
}

/// Typed instruction variants.
///
/// Everything the weaver must inspect or synthesize is structured; any other
/// opcode travels through untouched as `Raw`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum InsnKind {
    Field {
        op: FieldOp,
        owner: String,
        name: String,
        descriptor: String,
    },
    Invoke {
        kind: InvokeKind,
        owner: String,
        name: String,
        descriptor: String,
    },
    Var {
        op: VarOp,
        kind: ValueKind,
        slot: u16,
    },
    Iinc {
        slot: u16,
        delta: i16,
    },
    Label,
    Jump {
        opcode: u8,
        target: InsnId,
    },
    /// Return-family instruction; `None` is a void return.
    Return {
        kind: Option<ValueKind>,
    },
    PushInt(i32),
    PushNull,
    Dup,
    NewObject {
        class: String,
    },
    NewRefArray {
        element: String,
    },
    ArrayStoreRef,
    Raw {
        opcode: u8,
    },
}

/// Ordered mutable instruction sequence with stable node identities.
///
/// All mutations are expressed relative to existing node identities, never by
/// absolute index, so insertions compose regardless of earlier insertions
/// shifting absolute positions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct InsnList {
    insns: Vec<Insn>,
    next_id: u32,
}

impl InsnList {
    pub(crate) fn new() -> Self {
        InsnList {
            insns: Vec::new(),
            next_id: 0,
        }
    }

    /// Build a list from instruction payloads, assigning identities in order.
    pub(crate) fn from_kinds(kinds: Vec<InsnKind>) -> Self {
        let mut list = InsnList::new();
        for kind in kinds {
            list.push(kind);
        }
        list
    }

    pub(crate) fn len(&self) -> usize {
        self.insns.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.insns.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Insn> {
        self.insns.iter()
    }

    /// Snapshot of the current id sequence, for iterate-while-mutating passes.
    pub(crate) fn ids(&self) -> Vec<InsnId> {
        self.insns.iter().map(|insn| insn.id).collect()
    }

    pub(crate) fn first_id(&self) -> Option<InsnId> {
        self.insns.first().map(|insn| insn.id)
    }

    pub(crate) fn get(&self, id: InsnId) -> Option<&Insn> {
        self.insns.iter().find(|insn| insn.id == id)
    }

    pub(crate) fn push(&mut self, kind: InsnKind) -> InsnId {
        let id = self.fresh_id();
        self.insns.push(Insn { id, kind });
        id
    }

    /// Insert instructions immediately before the node identified by `target`,
    /// preserving their given order.
    pub(crate) fn insert_before(&mut self, target: InsnId, kinds: Vec<InsnKind>) -> Result<()> {
        let position = self
            .position_of(target)
            .with_context(|| format!("instruction {target:?} is not part of this stream"))?;
        let fresh: Vec<Insn> = kinds
            .into_iter()
            .map(|kind| Insn {
                id: self.fresh_id(),
                kind,
            })
            .collect();
        self.insns.splice(position..position, fresh);
        Ok(())
    }

    /// Shift every local-variable reference at or above `boundary` upward by
    /// `width`. References below the boundary are untouched.
    pub(crate) fn shift_slots(&mut self, boundary: u16, width: u16) {
        for insn in &mut self.insns {
            match &mut insn.kind {
                InsnKind::Var { slot, .. } if *slot >= boundary => *slot += width,
                InsnKind::Iinc { slot, .. } if *slot >= boundary => *slot += width,
                _ => {}
            }
        }
    }

    fn position_of(&self, id: InsnId) -> Option<usize> {
        self.insns.iter().position(|insn| insn.id == id)
    }

    fn fresh_id(&mut self) -> InsnId {
        let id = InsnId(self.next_id);
        self.next_id += 1;
        id
    }
}
