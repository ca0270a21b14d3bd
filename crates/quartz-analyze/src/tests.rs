use crate::analyze_source;
use pretty_assertions::assert_eq;
use quartz_ir::{
    IrContract, IrExpression, IrStatement, Level, Literal, Scope, Type, Visibility,
};

fn analyze_ok(source: &str) -> IrContract {
    let analysis = analyze_source(source, "test.qz");
    assert!(
        !analysis.diagnostics.has_errors(),
        "unexpected diagnostics: {:?}",
        analysis.diagnostics
    );
    analysis.contract.expect("analysis produced a contract")
}

fn errors(source: &str) -> Vec<String> {
    analyze_source(source, "test.qz")
        .diagnostics
        .iter()
        .filter(|d| d.level == Level::Error)
        .map(|d| d.message.clone())
        .collect()
}

#[test]
fn test_storage_increment_lowering() {
    let contract = analyze_ok(
        r#"
contract Counter {
    value: u256;

    @external
    fn increment() {
        this.value = this.value + 1;
    }

    @view
    fn get(): u256 {
        return this.value;
    }
}
"#,
    );

    assert_eq!(contract.name, "Counter");
    assert_eq!(contract.storage[0].slot, Some(0));

    let increment = contract.method("increment").unwrap();
    assert_eq!(increment.visibility, Visibility::External);

    let storage_value = IrExpression::Var {
        name: "value".to_string(),
        scope: Scope::Storage,
        ty: Type::U256,
    };
    let expected = IrStatement::Expr(IrExpression::Call {
        target: "store".to_string(),
        receiver: Some(Box::new(storage_value.clone())),
        args: vec![IrExpression::Call {
            target: "add".to_string(),
            receiver: Some(Box::new(storage_value)),
            args: vec![IrExpression::number(1)],
            ret: Type::U256,
            scope: Scope::Memory,
        }],
        ret: Type::Void,
        scope: Scope::Storage,
    });
    assert_eq!(increment.body[0], expected);

    let get = contract.method("get").unwrap();
    assert_eq!(get.visibility, Visibility::View);
    assert_eq!(get.return_type, Type::U256);
    match &get.body[0] {
        IrStatement::Return(Some(IrExpression::Var { scope, .. })) => {
            assert_eq!(*scope, Scope::Storage);
        }
        other => panic!("expected a storage return, got {:?}", other),
    }
}

#[test]
fn test_unannotated_method_is_internal() {
    let contract = analyze_ok(
        r#"
contract Quiet {
    fn helper(): u256 {
        return 7;
    }
}
"#,
    );
    assert_eq!(
        contract.method("helper").unwrap().visibility,
        Visibility::Internal
    );
    assert!(!contract.method("helper").unwrap().is_externally_callable());
}

#[test]
fn test_inherited_methods_come_first_and_views_stay_behind() {
    let contract = analyze_ok(
        r#"
contract Base {
    @view
    fn peek(): u256 {
        return 0;
    }

    @public
    fn shared(): u256 {
        return 1;
    }
}

contract Child extends Base {
    @external
    fn act() {
        let x = shared();
    }
}
"#,
    );

    let names: Vec<&str> = contract.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["shared", "act"]);
}

#[test]
fn test_storage_slots_run_parent_then_child() {
    let contract = analyze_ok(
        r#"
contract Base {
    a: u256;
}

contract Child extends Base {
    b: u256;

    @external
    fn sum(): u256 {
        return this.a + this.b;
    }
}
"#,
    );

    assert_eq!(contract.storage.len(), 2);
    assert_eq!((contract.storage[0].name.as_str(), contract.storage[0].slot), ("a", Some(0)));
    assert_eq!((contract.storage[1].name.as_str(), contract.storage[1].slot), ("b", Some(1)));
}

#[test]
fn test_mapping_reads_and_writes_lower_to_map_calls() {
    let contract = analyze_ok(
        r#"
contract Bank {
    balances: map<address, u256>;

    @external
    fn deposit(who: address, amount: u256) {
        this.balances[who] = this.balances[who] + amount;
    }
}
"#,
    );

    let deposit = contract.method("deposit").unwrap();
    let IrStatement::Expr(IrExpression::Call {
        target,
        receiver,
        args,
        scope,
        ..
    }) = &deposit.body[0]
    else {
        panic!("expected a call statement");
    };
    assert_eq!(target, "map_set");
    assert_eq!(*scope, Scope::Storage);
    match receiver.as_deref() {
        Some(IrExpression::Var { name, scope, ty }) => {
            assert_eq!(name, "balances");
            assert_eq!(*scope, Scope::Storage);
            assert_eq!(
                *ty,
                Type::Mapping(Box::new(Type::Address), Box::new(Type::U256))
            );
        }
        other => panic!("expected the mapping field as receiver, got {:?}", other),
    }

    // args are [key, value]; the value reads through map_get.
    assert_eq!(args.len(), 2);
    match &args[1] {
        IrExpression::Call {
            target,
            receiver: Some(inner),
            ret,
            ..
        } => {
            assert_eq!(target, "add");
            assert_eq!(*ret, Type::U256);
            match inner.as_ref() {
                IrExpression::Call { target, ret, .. } => {
                    assert_eq!(target, "map_get");
                    assert_eq!(*ret, Type::U256);
                }
                other => panic!("expected map_get on the left, got {:?}", other),
            }
        }
        other => panic!("expected add over map_get, got {:?}", other),
    }
}

#[test]
fn test_struct_literal_args_follow_declaration_order() {
    let contract = analyze_ok(
        r#"
struct Point {
    x: u256;
    y: u256;
}

contract Geo {
    @external
    fn make(): u256 {
        let p = Point { y: 2, x: 1 };
        return p.x;
    }
}
"#,
    );

    let make = contract.method("make").unwrap();
    let IrStatement::Let { init, ty, .. } = &make.body[0] else {
        panic!("expected a let statement");
    };
    assert_eq!(*ty, Type::Struct("Point".to_string()));
    let IrExpression::Call { target, args, .. } = init else {
        panic!("expected a constructor call");
    };
    assert_eq!(target, "new");
    assert_eq!(
        args,
        &vec![IrExpression::number(1), IrExpression::number(2)]
    );

    let IrStatement::Return(Some(IrExpression::Member { property, ty, .. })) = &make.body[1]
    else {
        panic!("expected a member return");
    };
    assert_eq!(property, "x");
    assert_eq!(*ty, Type::U256);
}

#[test]
fn test_emit_lowers_to_event_call() {
    let contract = analyze_ok(
        r#"
event Transfer(from: indexed address, to: indexed address, amount: u256);

contract Token {
    @external
    fn send(to: address, amount: u256) {
        emit Transfer(to, to, amount);
    }
}
"#,
    );

    assert_eq!(contract.events.len(), 1);
    assert!(contract.events[0].params[0].indexed);
    assert!(!contract.events[0].params[2].indexed);

    let send = contract.method("send").unwrap();
    let IrStatement::Expr(IrExpression::Call { target, ret, .. }) = &send.body[0] else {
        panic!("expected an event call");
    };
    assert_eq!(target, "Transfer");
    assert_eq!(*ret, Type::Void);
}

#[test]
fn test_revert_references_declared_error() {
    let contract = analyze_ok(
        r#"
error Underflow(have: u256, want: u256);

contract Vault {
    total: u256;

    @external
    fn withdraw(amount: u256) {
        if (this.total < amount) {
            revert Underflow(this.total, amount);
        }
        this.total = this.total - amount;
    }
}
"#,
    );

    let withdraw = contract.method("withdraw").unwrap();
    let IrStatement::If { then, .. } = &withdraw.body[0] else {
        panic!("expected an if statement");
    };
    match &then[0] {
        IrStatement::Revert { error, args } => {
            assert_eq!(error, "Underflow");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected revert, got {:?}", other),
    }
}

#[test]
fn test_constructor_defaults_public_and_rejects_other_annotations() {
    let contract = analyze_ok(
        r#"
contract Init {
    value: u256;

    constructor() {
        this.value = 1;
    }
}
"#,
    );
    let ctor = contract.constructor().unwrap();
    assert_eq!(ctor.visibility, Visibility::Public);
    assert!(ctor.is_constructor);

    let messages = errors(
        r#"
contract Init {
    @internal
    constructor() {
    }
}
"#,
    );
    assert!(messages.iter().any(|m| m.contains("always public")));
}

#[test]
fn test_conflicting_annotations_are_rejected() {
    let messages = errors(
        r#"
contract Both {
    @external
    @view
    fn twice() {
    }
}
"#,
    );
    assert!(messages
        .iter()
        .any(|m| m.contains("more than one visibility annotation")));
}

#[test]
fn test_unresolved_identifier_is_reported() {
    let messages = errors(
        r#"
contract Broken {
    @external
    fn run(): u256 {
        return missing;
    }
}
"#,
    );
    assert!(messages.iter().any(|m| m.contains("unresolved identifier `missing`")));
}

#[test]
fn test_undeclared_event_and_error_are_reported() {
    let messages = errors(
        r#"
contract Loud {
    @external
    fn run() {
        emit Nothing(1);
        revert Nowhere();
    }
}
"#,
    );
    assert!(messages.iter().any(|m| m.contains("undeclared event `Nothing`")));
    assert!(messages.iter().any(|m| m.contains("undeclared error `Nowhere`")));
}

#[test]
fn test_unknown_parent_is_reported() {
    let messages = errors(
        r#"
contract Child extends Ghost {
}
"#,
    );
    assert!(messages.iter().any(|m| m.contains("unknown parent contract `Ghost`")));
}

#[test]
fn test_main_contract_is_last_unreferenced() {
    let contract = analyze_ok(
        r#"
contract First {
}

contract Second {
}
"#,
    );
    assert_eq!(contract.name, "Second");
}

#[test]
fn test_mapping_in_struct_is_a_layout_error() {
    let analysis = analyze_source(
        r#"
struct Bad {
    entries: map<u256, u256>;
}

contract Holder {
}
"#,
        "test.qz",
    );
    assert!(analysis.diagnostics.has_errors());
    assert!(analysis
        .diagnostics
        .iter()
        .any(|d| d.message.contains("layout")));
}

#[test]
fn test_parse_failure_becomes_syntax_diagnostic() {
    let analysis = analyze_source("contract {", "broken.qz");
    assert!(analysis.contract.is_none());
    assert!(analysis.diagnostics.has_errors());
}

#[test]
fn test_shadowing_in_nested_blocks() {
    let contract = analyze_ok(
        r#"
contract Shadow {
    @external
    fn run(): u256 {
        let x = 1;
        {
            let x = 2;
        }
        return x;
    }
}
"#,
    );
    // The outer binding survives the inner block.
    let run = contract.method("run").unwrap();
    assert!(matches!(run.body[2], IrStatement::Return(Some(_))));
}

#[test]
fn test_duplicate_local_in_same_scope_is_reported() {
    let messages = errors(
        r#"
contract Dup {
    @external
    fn run() {
        let x = 1;
        let x = 2;
    }
}
"#,
    );
    assert!(messages.iter().any(|m| m.contains("already declared")));
}

#[test]
fn test_child_override_is_not_a_duplicate() {
    let contract = analyze_ok(
        r#"
contract Base {
    @public
    fn describe(): u256 {
        return 1;
    }
}

contract Child extends Base {
    @public
    fn describe(): u256 {
        return 2;
    }
}
"#,
    );
    // The merge keeps both definitions; nothing about the redeclaration
    // is an error.
    let names: Vec<&str> = contract.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["describe", "describe"]);
}

#[test]
fn test_duplicate_method_in_one_contract_is_reported() {
    let messages = errors(
        r#"
contract Twice {
    @external
    fn run() {
    }

    @external
    fn run() {
    }
}
"#,
    );
    assert!(messages.iter().any(|m| m.contains("already declared")));
}
