use anyhow::{Context, Result};

use crate::ir::{Class, Field, FieldAccess, FieldOp, InsnKind, InsnList, InvokeKind, Method, MethodAccess};
use crate::names::{CLASS_INITIALIZER, CONSTRUCTOR, NO_ARG_VOID, SINGLETON_FIELD, object_descriptor};

/// Give an aspect class its singleton: one static holder field, populated at
/// the head of the static initializer. The initializer is created when the
/// class has none; otherwise the construction sequence is prepended so the
/// instance exists before any original initialization code runs.
pub(crate) fn inject_singleton(class: &mut Class) -> Result<()> {
    if class.fields.iter().any(|field| field.name == SINGLETON_FIELD) {
        anyhow::bail!(
            "aspect class {} already declares a field named {SINGLETON_FIELD}",
            class.name
        );
    }

    let descriptor = object_descriptor(&class.name);
    class.fields.push(Field {
        name: SINGLETON_FIELD.to_string(),
        descriptor: descriptor.clone(),
        access: FieldAccess {
            is_public: true,
            is_static: true,
            is_final: true,
        },
    });

    let construction = vec![
        InsnKind::NewObject {
            class: class.name.clone(),
        },
        InsnKind::Dup,
        InsnKind::Invoke {
            kind: InvokeKind::Special,
            owner: class.name.clone(),
            name: CONSTRUCTOR.to_string(),
            descriptor: NO_ARG_VOID.to_string(),
        },
        InsnKind::Field {
            op: FieldOp::PutStatic,
            owner: class.name.clone(),
            name: SINGLETON_FIELD.to_string(),
            descriptor,
        },
    ];

    match class
        .methods
        .iter_mut()
        .find(|method| method.name == CLASS_INITIALIZER)
    {
        Some(clinit) => {
            let code = clinit
                .code
                .as_mut()
                .with_context(|| format!("static initializer of {} has no code", class.name))?;
            let first = code
                .first_id()
                .with_context(|| format!("static initializer of {} is empty", class.name))?;
            code.insert_before(first, construction)?;
        }
        None => {
            let mut code = InsnList::from_kinds(construction);
            code.push(InsnKind::Return { kind: None });
            class.methods.push(Method {
                name: CLASS_INITIALIZER.to_string(),
                descriptor: NO_ARG_VOID.to_string(),
                access: MethodAccess {
                    is_public: false,
                    is_static: true,
                    is_abstract: false,
                },
                annotations: Vec::new(),
                code: Some(code),
            });
        }
    }
    Ok(())
}
