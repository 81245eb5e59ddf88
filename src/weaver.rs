use anyhow::{Context, Result};

use crate::descriptor::{MethodSig, parse_method_descriptor};
use crate::ir::{FieldOp, InsnId, InsnKind, InsnList, InvokeKind, Method, ValueKind, VarOp};
use crate::names::{
    CALLING_POINT_CLASS, CONSTRUCTOR, JAVA_OBJECT, JOIN_POINT_CLASS, POINT_CTOR_DESCRIPTOR,
    SINGLETON_FIELD, object_descriptor,
};
use crate::pointcut::{AspectParam, PointcutDescriptor, Position};

/// Slots reserved for the synthesized join-point local. The reference itself
/// needs one slot; the second is the reservation the original system applies,
/// kept here as a single tested constant.
pub(crate) const SYNTH_LOCAL_WIDTH: u16 = 2;

/// Mutation counters for one method.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct MethodSummary {
    pub(crate) insertions: usize,
    pub(crate) synthesized_point: bool,
}

/// One-shot binding for the join-point value of the method under rewrite.
/// Entry, Return, and Call processing share it; the slot shift and the
/// construction sequence happen exactly once no matter how many aspect
/// invocations read the value.
struct PointBinding {
    slot: Option<u16>,
    boundary: u16,
    entry: InsnId,
}

impl PointBinding {
    fn ensure(&mut self, code: &mut InsnList, sig: &MethodSig, is_static: bool, point_class: &str) -> Result<u16> {
        if let Some(slot) = self.slot {
            return Ok(slot);
        }
        // Shift existing references first so the synthesized code below can
        // use final slot numbers.
        code.shift_slots(self.boundary, SYNTH_LOCAL_WIDTH);
        code.insert_before(
            self.entry,
            synthesize_point(point_class, sig, is_static, self.boundary),
        )?;
        self.slot = Some(self.boundary);
        Ok(self.boundary)
    }
}

/// Weave one method: call-site interception first, then entry/return
/// interception. `class_pointcuts` are the Entry/Return descriptors already
/// resolved for the declaring class; `call_pointcuts` are matched here per
/// invocation instruction.
pub(crate) fn weave_method(
    class_name: &str,
    super_name: Option<&str>,
    method: &mut Method,
    class_pointcuts: &[&PointcutDescriptor],
    call_pointcuts: &[PointcutDescriptor],
) -> Result<MethodSummary> {
    let mut summary = MethodSummary::default();
    let is_static = method.access.is_static;
    let is_constructor = method.name == CONSTRUCTOR;
    let method_name = method.name.clone();
    let method_descriptor = method.descriptor.clone();
    let Some(code) = method.code.as_mut() else {
        return Ok(summary);
    };
    if code.is_empty() {
        return Ok(summary);
    }

    // Snapshot the matched call sites and the applicable Entry/Return
    // descriptors before touching the stream.
    let matched_calls: Vec<(InsnId, &PointcutDescriptor)> = code
        .iter()
        .filter_map(|insn| match &insn.kind {
            InsnKind::Invoke {
                owner,
                name,
                descriptor,
                ..
            } => Some((insn.id, owner, name, descriptor)),
            _ => None,
        })
        .flat_map(|(id, owner, name, descriptor)| {
            call_pointcuts
                .iter()
                .filter(move |pointcut| pointcut.matches_call(owner, name, descriptor))
                .map(move |pointcut| (id, pointcut))
        })
        .collect();
    let applicable: Vec<&PointcutDescriptor> = class_pointcuts
        .iter()
        .copied()
        .filter(|d| d.matches_method(&method_name, &method_descriptor))
        .collect();
    if matched_calls.is_empty() && applicable.is_empty() {
        return Ok(summary);
    }

    let sig = parse_method_descriptor(&method_descriptor)
        .with_context(|| format!("method {class_name}.{method_name}"))?;
    let entry = entry_point(code, is_constructor, class_name, super_name, &method_name)?;
    let mut binding = PointBinding {
        slot: None,
        boundary: sig.arg_region_width(is_static),
        entry,
    };

    // Call-site pass: the snapshot is walked while the live list mutates.
    for (id, pointcut) in &matched_calls {
        let slot = match pointcut.param {
            AspectParam::None => None,
            AspectParam::JoinPoint => {
                Some(binding.ensure(code, &sig, is_static, JOIN_POINT_CLASS)?)
            }
            AspectParam::CallingPoint => {
                Some(binding.ensure(code, &sig, is_static, CALLING_POINT_CLASS)?)
            }
        };
        code.insert_before(*id, advice_invocation(pointcut, slot))?;
        summary.insertions += 1;
    }

    // Entry/Return pass.
    if applicable.iter().any(|d| d.param.wants_point()) {
        binding.ensure(code, &sig, is_static, JOIN_POINT_CLASS)?;
    }

    for pointcut in applicable.iter().filter(|d| d.position == Position::Entry) {
        let slot = point_slot(&binding, pointcut);
        code.insert_before(entry, advice_invocation(pointcut, slot))?;
        summary.insertions += 1;
    }

    let returns: Vec<InsnId> = code
        .iter()
        .filter(|insn| matches!(insn.kind, InsnKind::Return { .. }))
        .map(|insn| insn.id)
        .collect();
    for pointcut in applicable.iter().filter(|d| d.position == Position::Return) {
        let slot = point_slot(&binding, pointcut);
        for id in &returns {
            code.insert_before(*id, advice_invocation(pointcut, slot))?;
            summary.insertions += 1;
        }
    }

    summary.synthesized_point = binding.slot.is_some();
    Ok(summary)
}

fn point_slot(binding: &PointBinding, pointcut: &PointcutDescriptor) -> Option<u16> {
    if pointcut.param.wants_point() {
        binding.slot
    } else {
        None
    }
}

/// The injection point for entry advice and join-point construction: the first
/// instruction, except in constructors, where it is the first instruction
/// after the super/this constructor invocation so injected code never runs
/// before object initialization completes.
fn entry_point(
    code: &InsnList,
    is_constructor: bool,
    class_name: &str,
    super_name: Option<&str>,
    method_name: &str,
) -> Result<InsnId> {
    if !is_constructor {
        return code
            .first_id()
            .with_context(|| format!("method {class_name}.{method_name} has no instructions"));
    }

    let mut previous_was_init = false;
    for insn in code.iter() {
        if previous_was_init {
            return Ok(insn.id);
        }
        if let InsnKind::Invoke {
            kind: InvokeKind::Special,
            owner,
            name,
            ..
        } = &insn.kind
            && name == CONSTRUCTOR
            && (owner == class_name || Some(owner.as_str()) == super_name)
        {
            previous_was_init = true;
        }
    }
    anyhow::bail!(
        "constructor {class_name}.{method_name} has no super/this constructor invocation"
    );
}

/// Construction sequence for a JoinPoint/CallingPoint value: box the incoming
/// arguments into an Object array, pass the receiver (null for static
/// methods), store the result in the freshly allocated local.
fn synthesize_point(
    point_class: &str,
    sig: &MethodSig,
    is_static: bool,
    slot: u16,
) -> Vec<InsnKind> {
    let mut kinds = vec![
        InsnKind::NewObject {
            class: point_class.to_string(),
        },
        InsnKind::Dup,
        if is_static {
            InsnKind::PushNull
        } else {
            InsnKind::Var {
                op: VarOp::Load,
                kind: ValueKind::Ref,
                slot: 0,
            }
        },
        InsnKind::PushInt(sig.args.len() as i32),
        InsnKind::NewRefArray {
            element: JAVA_OBJECT.to_string(),
        },
    ];
    let mut arg_slot = if is_static { 0 } else { 1 };
    for (index, arg) in sig.args.iter().enumerate() {
        kinds.push(InsnKind::Dup);
        kinds.push(InsnKind::PushInt(index as i32));
        kinds.push(InsnKind::Var {
            op: VarOp::Load,
            kind: arg.value_kind(),
            slot: arg_slot,
        });
        if let Some((wrapper, valueof_descriptor)) = arg.boxing() {
            kinds.push(InsnKind::Invoke {
                kind: InvokeKind::Static,
                owner: wrapper.to_string(),
                name: "valueOf".to_string(),
                descriptor: valueof_descriptor.to_string(),
            });
        }
        kinds.push(InsnKind::ArrayStoreRef);
        arg_slot += arg.width();
    }
    kinds.push(InsnKind::Invoke {
        kind: InvokeKind::Special,
        owner: point_class.to_string(),
        name: CONSTRUCTOR.to_string(),
        descriptor: POINT_CTOR_DESCRIPTOR.to_string(),
    });
    kinds.push(InsnKind::Var {
        op: VarOp::Store,
        kind: ValueKind::Ref,
        slot,
    });
    kinds
}

/// Aspect invocation sequence: load the singleton, optionally load the
/// join-point local, invoke the aspect method virtually.
fn advice_invocation(pointcut: &PointcutDescriptor, point_slot: Option<u16>) -> Vec<InsnKind> {
    let mut kinds = vec![InsnKind::Field {
        op: FieldOp::GetStatic,
        owner: pointcut.aspect_class.clone(),
        name: SINGLETON_FIELD.to_string(),
        descriptor: object_descriptor(&pointcut.aspect_class),
    }];
    if let Some(slot) = point_slot {
        kinds.push(InsnKind::Var {
            op: VarOp::Load,
            kind: ValueKind::Ref,
            slot,
        });
    }
    kinds.push(InsnKind::Invoke {
        kind: InvokeKind::Virtual,
        owner: pointcut.aspect_class.clone(),
        name: pointcut.aspect_method.clone(),
        descriptor: pointcut.aspect_descriptor.clone(),
    });
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::MethodAccess;
    use crate::pointcut::{TargetKind, compile_pattern};

    fn pointcut(
        position: Position,
        param: AspectParam,
        aspect_method: &str,
        fun_name: &str,
    ) -> PointcutDescriptor {
        let descriptor = match param {
            AspectParam::None => "()V",
            AspectParam::JoinPoint => "(Lio/jweave/api/JoinPoint;)V",
            AspectParam::CallingPoint => "(Lio/jweave/api/CallingPoint;)V",
        };
        PointcutDescriptor {
            aspect_class: "com/example/TraceAspect".to_string(),
            aspect_method: aspect_method.to_string(),
            aspect_descriptor: descriptor.to_string(),
            param,
            target_kind: TargetKind::ByClassName,
            target: compile_pattern(".*").expect("target"),
            fun_name: compile_pattern(fun_name).expect("fun name"),
            fun_desc: compile_pattern(".*").expect("fun desc"),
            position,
        }
    }

    fn method_with(name: &str, descriptor: &str, is_static: bool, kinds: Vec<InsnKind>) -> Method {
        Method {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            access: MethodAccess {
                is_public: true,
                is_static,
                is_abstract: false,
            },
            annotations: Vec::new(),
            code: Some(InsnList::from_kinds(kinds)),
        }
    }

    fn kinds_of(method: &Method) -> Vec<InsnKind> {
        method
            .code
            .as_ref()
            .expect("code")
            .iter()
            .map(|insn| insn.kind.clone())
            .collect()
    }

    fn invoke_virtual(owner: &str, name: &str, descriptor: &str) -> InsnKind {
        InsnKind::Invoke {
            kind: InvokeKind::Virtual,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }

    fn advice_call(aspect_method: &str, descriptor: &str) -> InsnKind {
        invoke_virtual("com/example/TraceAspect", aspect_method, descriptor)
    }

    fn count(kinds: &[InsnKind], wanted: &InsnKind) -> usize {
        kinds.iter().filter(|kind| *kind == wanted).count()
    }

    #[test]
    fn entry_advice_lands_once_at_the_first_instruction() {
        let mut method = method_with(
            "doWork",
            "(I)V",
            false,
            vec![
                InsnKind::Var {
                    op: VarOp::Load,
                    kind: ValueKind::Int,
                    slot: 1,
                },
                InsnKind::Return { kind: None },
            ],
        );
        let d = pointcut(Position::Entry, AspectParam::None, "onEnter", ".*");

        let summary = weave_method("com/x/Target", Some("java/lang/Object"), &mut method, &[&d], &[])
            .expect("weave");

        let kinds = kinds_of(&method);
        assert_eq!(1, summary.insertions);
        assert!(!summary.synthesized_point);
        assert!(matches!(
            kinds[0],
            InsnKind::Field {
                op: FieldOp::GetStatic,
                ..
            }
        ));
        assert_eq!(advice_call("onEnter", "()V"), kinds[1]);
    }

    #[test]
    fn return_advice_lands_before_every_return() {
        let mut method = method_with(
            "choose",
            "(Z)I",
            false,
            vec![
                InsnKind::Var {
                    op: VarOp::Load,
                    kind: ValueKind::Int,
                    slot: 1,
                },
                InsnKind::Return {
                    kind: Some(ValueKind::Int),
                },
                InsnKind::PushInt(0),
                InsnKind::Return {
                    kind: Some(ValueKind::Int),
                },
            ],
        );
        let d = pointcut(Position::Return, AspectParam::None, "onReturn", ".*");

        let summary = weave_method("com/x/Target", Some("java/lang/Object"), &mut method, &[&d], &[])
            .expect("weave");

        assert_eq!(2, summary.insertions);
        let kinds = kinds_of(&method);
        assert_eq!(2, count(&kinds, &advice_call("onReturn", "()V")));
        // Each advice invocation sits immediately before a return.
        for (index, kind) in kinds.iter().enumerate() {
            if *kind == advice_call("onReturn", "()V") {
                assert!(matches!(kinds[index + 1], InsnKind::Return { .. }));
            }
        }
    }

    #[test]
    fn constructor_entry_is_after_the_superclass_init_call() {
        let mut method = method_with(
            CONSTRUCTOR,
            "()V",
            false,
            vec![
                InsnKind::Var {
                    op: VarOp::Load,
                    kind: ValueKind::Ref,
                    slot: 0,
                },
                InsnKind::Invoke {
                    kind: InvokeKind::Special,
                    owner: "java/lang/Object".to_string(),
                    name: CONSTRUCTOR.to_string(),
                    descriptor: "()V".to_string(),
                },
                InsnKind::Return { kind: None },
            ],
        );
        let d = pointcut(Position::Entry, AspectParam::None, "onEnter", ".*");

        weave_method("com/x/Target", Some("java/lang/Object"), &mut method, &[&d], &[])
            .expect("weave");

        let kinds = kinds_of(&method);
        assert!(matches!(
            kinds[1],
            InsnKind::Invoke {
                kind: InvokeKind::Special,
                ..
            }
        ));
        assert!(matches!(kinds[2], InsnKind::Field { .. }));
        assert_eq!(advice_call("onEnter", "()V"), kinds[3]);
    }

    #[test]
    fn constructor_without_init_call_is_a_fatal_invariant_violation() {
        let mut method = method_with(
            CONSTRUCTOR,
            "()V",
            false,
            vec![InsnKind::Return { kind: None }],
        );
        let d = pointcut(Position::Entry, AspectParam::None, "onEnter", ".*");

        let err = weave_method(
            "com/x/Target",
            Some("java/lang/Object"),
            &mut method,
            &[&d],
            &[],
        )
        .expect_err("must fail");
        assert!(format!("{err:#}").contains("no super/this constructor invocation"));
    }

    #[test]
    fn entry_and_return_share_one_synthesized_join_point() {
        let mut method = method_with(
            "doWork",
            "(I)V",
            false,
            vec![
                InsnKind::Var {
                    op: VarOp::Load,
                    kind: ValueKind::Int,
                    slot: 1,
                },
                InsnKind::Return { kind: None },
            ],
        );
        let enter = pointcut(Position::Entry, AspectParam::JoinPoint, "onEnter", ".*");
        let leave = pointcut(Position::Return, AspectParam::JoinPoint, "onReturn", ".*");

        let summary = weave_method(
            "com/x/Target",
            Some("java/lang/Object"),
            &mut method,
            &[&enter, &leave],
            &[],
        )
        .expect("weave");

        assert!(summary.synthesized_point);
        let kinds = kinds_of(&method);
        let constructions = kinds
            .iter()
            .filter(|kind| {
                matches!(kind, InsnKind::NewObject { class } if class == JOIN_POINT_CLASS)
            })
            .count();
        assert_eq!(1, constructions);
        // Both advice invocations load the shared local.
        let point_loads = count(
            &kinds,
            &InsnKind::Var {
                op: VarOp::Load,
                kind: ValueKind::Ref,
                slot: 2,
            },
        );
        assert_eq!(2, point_loads);
    }

    #[test]
    fn slot_references_at_or_above_the_boundary_shift_by_the_synth_width() {
        // doWork(I)V on an instance: boundary is slot 2. Slot 1 is an
        // argument, slots 2 and 4 are interior locals that must move.
        let mut method = method_with(
            "doWork",
            "(I)V",
            false,
            vec![
                InsnKind::Var {
                    op: VarOp::Load,
                    kind: ValueKind::Int,
                    slot: 1,
                },
                InsnKind::Var {
                    op: VarOp::Store,
                    kind: ValueKind::Int,
                    slot: 2,
                },
                InsnKind::Iinc { slot: 4, delta: 1 },
                InsnKind::Return { kind: None },
            ],
        );
        let d = pointcut(Position::Entry, AspectParam::JoinPoint, "onEnter", ".*");

        weave_method("com/x/Target", Some("java/lang/Object"), &mut method, &[&d], &[])
            .expect("weave");

        let kinds = kinds_of(&method);
        assert_eq!(
            1,
            count(
                &kinds,
                &InsnKind::Var {
                    op: VarOp::Store,
                    kind: ValueKind::Int,
                    slot: 2 + SYNTH_LOCAL_WIDTH,
                }
            )
        );
        assert_eq!(1, count(&kinds, &InsnKind::Iinc { slot: 6, delta: 1 }));
        // The argument load below the boundary is unchanged: one original
        // load at slot 1 plus one synthesized load boxing the argument.
        assert_eq!(
            2,
            count(
                &kinds,
                &InsnKind::Var {
                    op: VarOp::Load,
                    kind: ValueKind::Int,
                    slot: 1,
                }
            )
        );
    }

    #[test]
    fn static_method_join_point_uses_a_null_receiver() {
        let mut method = method_with(
            "doWork",
            "(J)V",
            true,
            vec![InsnKind::Return { kind: None }],
        );
        let d = pointcut(Position::Entry, AspectParam::JoinPoint, "onEnter", ".*");

        weave_method("com/x/Target", Some("java/lang/Object"), &mut method, &[&d], &[])
            .expect("weave");

        let kinds = kinds_of(&method);
        assert_eq!(1, count(&kinds, &InsnKind::PushNull));
        // Long argument is boxed via Long.valueOf and stored at index 0.
        assert!(kinds.iter().any(|kind| matches!(
            kind,
            InsnKind::Invoke { kind: InvokeKind::Static, owner, name, .. }
                if owner == "java/lang/Long" && name == "valueOf"
        )));
        // The synthesized local lands at the argument-region boundary (2 for
        // a static (J)V method).
        assert_eq!(
            1,
            count(
                &kinds,
                &InsnKind::Var {
                    op: VarOp::Store,
                    kind: ValueKind::Ref,
                    slot: 2,
                }
            )
        );
    }

    #[test]
    fn end_to_end_entry_scenario_for_do_work() {
        // onEnter(JoinPoint) targeting com/x/Target.doWork(I)V: array
        // construction, join-point construction, singleton load, invocation,
        // all before the first original instruction; nothing else altered.
        let original = vec![
            InsnKind::Var {
                op: VarOp::Load,
                kind: ValueKind::Int,
                slot: 1,
            },
            InsnKind::Return { kind: None },
        ];
        let mut method = method_with("doWork", "(I)V", false, original.clone());
        let d = pointcut(Position::Entry, AspectParam::JoinPoint, "onEnter", ".*");

        weave_method("com/x/Target", Some("java/lang/Object"), &mut method, &[&d], &[])
            .expect("weave");

        let kinds = kinds_of(&method);
        let expected_prefix = vec![
            InsnKind::NewObject {
                class: JOIN_POINT_CLASS.to_string(),
            },
            InsnKind::Dup,
            InsnKind::Var {
                op: VarOp::Load,
                kind: ValueKind::Ref,
                slot: 0,
            },
            InsnKind::PushInt(1),
            InsnKind::NewRefArray {
                element: JAVA_OBJECT.to_string(),
            },
            InsnKind::Dup,
            InsnKind::PushInt(0),
            InsnKind::Var {
                op: VarOp::Load,
                kind: ValueKind::Int,
                slot: 1,
            },
            InsnKind::Invoke {
                kind: InvokeKind::Static,
                owner: "java/lang/Integer".to_string(),
                name: "valueOf".to_string(),
                descriptor: "(I)Ljava/lang/Integer;".to_string(),
            },
            InsnKind::ArrayStoreRef,
            InsnKind::Invoke {
                kind: InvokeKind::Special,
                owner: JOIN_POINT_CLASS.to_string(),
                name: CONSTRUCTOR.to_string(),
                descriptor: POINT_CTOR_DESCRIPTOR.to_string(),
            },
            InsnKind::Var {
                op: VarOp::Store,
                kind: ValueKind::Ref,
                slot: 2,
            },
            InsnKind::Field {
                op: FieldOp::GetStatic,
                owner: "com/example/TraceAspect".to_string(),
                name: SINGLETON_FIELD.to_string(),
                descriptor: "Lcom/example/TraceAspect;".to_string(),
            },
            InsnKind::Var {
                op: VarOp::Load,
                kind: ValueKind::Ref,
                slot: 2,
            },
            advice_call("onEnter", "(Lio/jweave/api/JoinPoint;)V"),
        ];
        assert_eq!(expected_prefix, kinds[..expected_prefix.len()].to_vec());
        assert_eq!(original, kinds[expected_prefix.len()..].to_vec());
    }

    #[test]
    fn end_to_end_call_scenario_without_parameters() {
        // A parameterless Call pointcut on com/x/Service#fetch: two matched
        // call sites get two insertion sequences, no synthesis anywhere.
        let fetch = InsnKind::Invoke {
            kind: InvokeKind::Virtual,
            owner: "com/x/Service".to_string(),
            name: "fetch".to_string(),
            descriptor: "()Ljava/lang/Object;".to_string(),
        };
        let mut method = method_with(
            "caller",
            "()V",
            false,
            vec![
                fetch.clone(),
                InsnKind::Raw { opcode: 0x57 },
                fetch.clone(),
                InsnKind::Raw { opcode: 0x57 },
                InsnKind::Return { kind: None },
            ],
        );
        let mut d = pointcut(Position::Call, AspectParam::None, "onCall", "fetch");
        d.target = compile_pattern("com/x/Service").expect("target");

        let summary = weave_method(
            "com/x/Caller",
            Some("java/lang/Object"),
            &mut method,
            &[],
            &[d],
        )
        .expect("weave");

        assert_eq!(2, summary.insertions);
        assert!(!summary.synthesized_point);
        let kinds = kinds_of(&method);
        assert_eq!(2, count(&kinds, &advice_call("onCall", "()V")));
        // Each insertion sits immediately before its matched invocation.
        for (index, kind) in kinds.iter().enumerate() {
            if *kind == advice_call("onCall", "()V") {
                assert_eq!(fetch, kinds[index + 1]);
            }
        }
        assert_eq!(9, kinds.len());
    }

    #[test]
    fn call_sites_share_one_calling_point() {
        let fetch = InsnKind::Invoke {
            kind: InvokeKind::Virtual,
            owner: "com/x/Service".to_string(),
            name: "fetch".to_string(),
            descriptor: "()Ljava/lang/Object;".to_string(),
        };
        let mut method = method_with(
            "caller",
            "()V",
            false,
            vec![
                fetch.clone(),
                InsnKind::Raw { opcode: 0x57 },
                fetch.clone(),
                InsnKind::Raw { opcode: 0x57 },
                InsnKind::Return { kind: None },
            ],
        );
        let mut d = pointcut(Position::Call, AspectParam::CallingPoint, "onCall", "fetch");
        d.target = compile_pattern("com/x/Service").expect("target");

        let summary = weave_method(
            "com/x/Caller",
            Some("java/lang/Object"),
            &mut method,
            &[],
            &[d],
        )
        .expect("weave");

        assert!(summary.synthesized_point);
        let kinds = kinds_of(&method);
        let constructions = kinds
            .iter()
            .filter(|kind| {
                matches!(kind, InsnKind::NewObject { class } if class == CALLING_POINT_CLASS)
            })
            .count();
        assert_eq!(1, constructions);
        assert_eq!(
            2,
            count(
                &kinds,
                &advice_call("onCall", "(Lio/jweave/api/CallingPoint;)V")
            )
        );
    }

    #[test]
    fn methods_without_code_are_left_alone() {
        let mut method = Method {
            name: "doWork".to_string(),
            descriptor: "()V".to_string(),
            access: MethodAccess {
                is_public: true,
                is_static: false,
                is_abstract: true,
            },
            annotations: Vec::new(),
            code: None,
        };
        let d = pointcut(Position::Entry, AspectParam::None, "onEnter", ".*");

        let summary = weave_method(
            "com/x/Target",
            Some("java/lang/Object"),
            &mut method,
            &[&d],
            &[],
        )
        .expect("weave");
        assert_eq!(0, summary.insertions);
    }
}
