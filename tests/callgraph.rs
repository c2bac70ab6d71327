//! End-to-end call-graph scenarios over a multi-class program.

use rustc_hash::FxHashSet;

use dexscope::prelude::*;

/// Builds a small application:
///
/// - `LApp; extends Ljava/lang/Object;` with rooted static `main([Ljava/lang/String;)V`
///   invoking `LWidget;.draw:()V` virtually and `LUtil;.log:()V` statically
/// - `LWidget;` with virtual `draw()V` (overridden by `LButton; extends LWidget;`),
///   whose body calls the final helper `LWidget;.measure:()V`
/// - `LButton;` overriding `draw()V`, calling `LUtil;.log:()V`
/// - `LUtil;` with static `log()V` (a sink) and a `<clinit>` calling an external library
/// - `LUtil;.log` recursing into itself once, to exercise cycles
struct Fixture {
    scope: Scope,
    main: MethodId,
    widget_draw: MethodId,
    button_draw: MethodId,
    measure: MethodId,
    log: MethodId,
    clinit: MethodId,
}

fn fixture() -> Fixture {
    let mut scope = Scope::new();
    let object = DexType::new("Ljava/lang/Object;");
    let app_ty = DexType::new("LApp;");
    let widget_ty = DexType::new("LWidget;");
    let button_ty = DexType::new("LButton;");
    let util_ty = DexType::new("LUtil;");

    let app = scope.add_class_parts(app_ty.clone(), Some(object.clone()), ClassAccess::PUBLIC);
    let widget = scope.add_class_parts(widget_ty.clone(), Some(object.clone()), ClassAccess::PUBLIC);
    let button =
        scope.add_class_parts(button_ty.clone(), Some(widget_ty.clone()), ClassAccess::PUBLIC);
    let util = scope.add_class_parts(util_ty.clone(), Some(object), ClassAccess::PUBLIC);

    let measure = scope.add_virtual_method(
        widget,
        Method::new(
            widget_ty.clone(),
            "measure",
            "()V",
            MethodAccess::PUBLIC | MethodAccess::FINAL,
        )
        .with_body(vec![Instruction::new(Opcode::ReturnVoid)]),
    );
    let widget_draw = scope.add_virtual_method(
        widget,
        Method::new(widget_ty.clone(), "draw", "()V", MethodAccess::PUBLIC).with_body(vec![
            Instruction::invoke(
                Opcode::InvokeVirtual,
                MethodRef::new(widget_ty.clone(), "measure", "()V"),
            ),
            Instruction::new(Opcode::ReturnVoid),
        ]),
    );
    let button_draw = scope.add_virtual_method(
        button,
        Method::new(button_ty, "draw", "()V", MethodAccess::PUBLIC).with_body(vec![
            Instruction::invoke(
                Opcode::InvokeStatic,
                MethodRef::new(util_ty.clone(), "log", "()V"),
            ),
            Instruction::new(Opcode::ReturnVoid),
        ]),
    );
    let log = scope.add_direct_method(
        util,
        Method::new(
            util_ty.clone(),
            "log",
            "()V",
            MethodAccess::PUBLIC | MethodAccess::STATIC,
        )
        .with_body(vec![
            Instruction::invoke(
                Opcode::InvokeStatic,
                MethodRef::new(util_ty.clone(), "log", "()V"),
            ),
            Instruction::new(Opcode::ReturnVoid),
        ]),
    );
    let clinit = scope.add_direct_method(
        util,
        Method::new(
            util_ty.clone(),
            "<clinit>",
            "()V",
            MethodAccess::STATIC | MethodAccess::CONSTRUCTOR,
        )
        .with_body(vec![
            Instruction::invoke(
                Opcode::InvokeStatic,
                MethodRef::new(DexType::new("Lexternal/Tracker;"), "init", "()V"),
            ),
            Instruction::new(Opcode::ReturnVoid),
        ]),
    );
    let main = scope.add_direct_method(
        app,
        Method::new(
            app_ty,
            "main",
            "([Ljava/lang/String;)V",
            MethodAccess::PUBLIC | MethodAccess::STATIC,
        )
        .with_body(vec![
            Instruction::invoke(
                Opcode::InvokeVirtual,
                MethodRef::new(widget_ty, "draw", "()V"),
            ),
            Instruction::invoke(Opcode::InvokeStatic, MethodRef::new(util_ty, "log", "()V")),
            Instruction::new(Opcode::ReturnVoid),
        ]),
    );
    scope.method(main).rstate().set_root();

    Fixture {
        scope,
        main,
        widget_draw,
        button_draw,
        measure,
        log,
        clinit,
    }
}

/// Collects the node set reachable from the ghost entry.
fn reachable_from_entry(graph: &CallGraph) -> FxHashSet<NodeId> {
    let mut seen = FxHashSet::default();
    let mut worklist = vec![graph.entry()];
    while let Some(node) = worklist.pop() {
        if !seen.insert(node) {
            continue;
        }
        worklist.extend(graph.successors(node));
    }
    seen
}

#[test]
fn every_non_ghost_node_is_reachable_from_entry() {
    let fixture = fixture();
    for graph in [
        build_single_callee_graph(&fixture.scope),
        build_complete_call_graph(&fixture.scope),
    ] {
        let reachable = reachable_from_entry(&graph);
        for node in graph.nodes() {
            if node != graph.exit() {
                assert!(
                    reachable.contains(&node),
                    "node {node} must be reachable from the ghost entry"
                );
            }
        }
    }
}

#[test]
fn every_sink_flows_into_ghost_exit() {
    let fixture = fixture();
    for graph in [
        build_single_callee_graph(&fixture.scope),
        build_complete_call_graph(&fixture.scope),
    ] {
        // measure has no invokes, and clinit's only invoke is unresolvable: both are
        // sinks under every strategy and must be wired to the exit.
        for sink in [fixture.measure, fixture.clinit] {
            let Some(node) = graph.node_of(sink) else {
                continue;
            };
            assert!(
                graph.successors(node).any(|n| n == graph.exit()),
                "sink {sink:?} must have an edge to the ghost exit"
            );
        }
    }
}

#[test]
fn complete_graph_covers_override_closure() {
    let fixture = fixture();
    let graph = build_complete_call_graph(&fixture.scope);

    // main's virtual invoke of Widget.draw must fan out to the override in Button.
    let callees = graph.callees(fixture.main);
    assert!(callees.contains(&fixture.widget_draw));
    assert!(callees.contains(&fixture.button_draw));
    assert!(callees.contains(&fixture.log));

    // Both draw edges originate from the same invoke instruction.
    let main_node = graph.node_of(fixture.main).unwrap();
    let draw_locators: FxHashSet<_> = graph
        .outgoing_edges(main_node)
        .filter(|&e| {
            let target = graph.edge_endpoints(e).map(|(_, t)| t);
            target == graph.node_of(fixture.widget_draw)
                || target == graph.node_of(fixture.button_draw)
        })
        .map(|e| graph.invoke_locator(e))
        .collect();
    assert_eq!(draw_locators.len(), 1);
}

#[test]
fn single_callee_graph_never_targets_true_virtuals() {
    let fixture = fixture();
    let graph = build_single_callee_graph(&fixture.scope);

    let override_graph = build_override_graph(&fixture.scope);
    let non_tv = non_true_virtuals(&override_graph, &fixture.scope);

    for node in graph.nodes() {
        for edge in graph.outgoing_edges(node) {
            if graph.invoke_locator(edge).is_none() {
                continue; // ghost edge
            }
            let (_, target) = graph.edge_endpoints(edge).unwrap();
            let Some(callee) = graph.method_of(target) else {
                continue;
            };
            let method = fixture.scope.method(callee);
            assert!(
                !method.is_virtual() || non_tv.contains(&callee),
                "single-callee edge must not target true-virtual {method}"
            );
        }
    }

    // The dispatchable draw call is dropped; the static call to log survives.
    assert!(!graph.callees(fixture.main).contains(&fixture.widget_draw));
    assert!(graph.callees(fixture.main).contains(&fixture.log));
    // measure is final (non-true-virtual), so Widget.draw keeps its edge to it.
    assert!(graph.callees(fixture.widget_draw).contains(&fixture.measure));
}

#[test]
fn true_virtuals_are_roots_in_single_callee_graph() {
    let fixture = fixture();
    let graph = build_single_callee_graph(&fixture.scope);

    let roots: FxHashSet<_> = graph
        .successors(graph.entry())
        .filter_map(|n| graph.method_of(n))
        .collect();
    assert!(roots.contains(&fixture.widget_draw), "true-virtual draw");
    assert!(roots.contains(&fixture.main), "rooted main");
    assert!(roots.contains(&fixture.clinit), "static initializer");
    assert!(!roots.contains(&fixture.measure), "final helper");
}

#[test]
fn recursion_is_recorded_without_divergence() {
    let fixture = fixture();
    let graph = build_complete_call_graph(&fixture.scope);
    assert!(graph.callees(fixture.log).contains(&fixture.log));
    assert!(graph.callers(fixture.log).contains(&fixture.log));
}

#[test]
fn dominators_run_on_the_call_graph() {
    let fixture = fixture();
    let graph = build_complete_call_graph(&fixture.scope);
    let doms = compute_dominators(&graph);

    assert_eq!(doms.idom(graph.entry()), Some(graph.entry()));

    // Walking idom from any reachable node terminates at the entry.
    for node in graph.nodes() {
        if doms.idom(node).is_none() {
            continue;
        }
        let mut current = node;
        let mut steps = 0;
        while current != graph.entry() {
            current = doms.idom(current).expect("reachable idom chain");
            steps += 1;
            assert!(steps <= graph.node_count(), "idom chain must terminate");
        }
    }

    // The ghost entry dominates every reachable node.
    for node in graph.nodes() {
        if doms.idom(node).is_some() {
            assert!(doms.dominates(graph.entry(), node));
        }
    }
}
