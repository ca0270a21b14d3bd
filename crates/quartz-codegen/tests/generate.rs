//! Full-pipeline checks: source text through analysis into generated
//! target code and ABI.

use quartz_analyze::analyze_source;
use quartz_codegen::{generate, CodegenError, CodegenOutput};

fn compile(source: &str) -> CodegenOutput {
    let analysis = analyze_source(source, "test.qz");
    assert!(
        !analysis.diagnostics.has_errors(),
        "analysis failed: {:?}",
        analysis.diagnostics
    );
    generate(
        &analysis.contract.expect("contract"),
        &analysis.diagnostics,
        "test.qz",
    )
    .expect("codegen")
}

const COUNTER: &str = r#"
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
"#;

#[test]
fn test_counter_target_shape() {
    let output = compile(COUNTER);
    let src = &output.source;

    // Accessors carry the slot, bodies carry only accessor calls.
    assert!(src.contains("static inline u256 load_value(void) {"));
    assert!(src.contains("return storage_load_word(0);"));
    assert!(src.contains("storage_store_word(0, v);"));

    assert!(src.contains("void Counter_increment(void) {"));
    assert!(src.contains("u256 _t0 = load_value();"));
    assert!(src.contains("u256 _t2 = u256_add(_t0, _t1);"));
    assert!(src.contains("store_value(_t2);"));

    assert!(src.contains("u256 Counter_get(void) {"));
    assert!(src.contains("void quartz_deploy(void) {"));
    // increment() has the well-known selector.
    assert!(src.contains("if (selector == 0xd09de08a) { /* increment() */"));
    assert!(src.contains("runtime_revert_unknown_selector();"));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_generation_is_deterministic() {
    let first = compile(COUNTER);
    let second = compile(COUNTER);
    assert_eq!(first.source, second.source);
    assert_eq!(first.abi, second.abi);
}

#[test]
fn test_repeated_local_reads_use_distinct_temps() {
    let output = compile(
        r#"
contract Doubler {
    @external
    fn twice(x: u256): u256 {
        return x + x;
    }
}
"#,
    );
    assert!(output.source.contains("u256 _t0 = u256_copy(x);"));
    assert!(output.source.contains("u256 _t1 = u256_copy(x);"));
}

#[test]
fn test_bool_storage_goes_through_word_conversion() {
    let output = compile(
        r#"
contract Switch {
    on: bool;

    @external
    fn flip() {
        this.on = !this.on;
    }

    @view
    fn state(): bool {
        return this.on;
    }
}
"#,
    );
    let src = &output.source;
    assert!(src.contains("return word_to_bool(storage_load_word(0));"));
    assert!(src.contains("storage_store_word(0, bool_to_word(v));"));
    assert!(src.contains("bool_t _t1 = !(_t0);"));
}

#[test]
fn test_struct_accessors_carry_packed_offsets() {
    let output = compile(
        r#"
struct UserInfo {
    age: u256;
    active: bool;
}

contract Registry {
    users: map<address, UserInfo>;

    @external
    fn register(who: address, age: u256) {
        let info = UserInfo { age: age, active: true };
        this.users[who] = info;
    }

    @view
    fn ageOf(who: address): u256 {
        let info = this.users[who];
        return info.age;
    }
}
"#,
    );
    let src = &output.source;
    assert!(src.contains("/* UserInfo: 33 bytes packed */"));
    assert!(src.contains("typedef struct { byte_t data[33]; } UserInfo;"));
    assert!(src.contains("return read_word(p->data + 0);"));
    assert!(src.contains("read_bool(p->data + 32)"));
    assert!(src.contains("UserInfo_new("));
    // Mapping accessors keyed by the field's slot, address key as word.
    assert!(src.contains("storage_map_load_ptr(0, addr_to_word(key), 33)"));
    assert!(src.contains("map_set_users("));
    assert!(src.contains("UserInfo_get_age("));
}

#[test]
fn test_child_override_shadows_inherited_body_with_warning() {
    let output = compile(
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
    assert_eq!(output.source.matches("u256 Child_describe(void) {").count(), 1);
    assert!(output
        .warnings
        .iter()
        .any(|w| w.message.contains("more than once after inheritance")));
}

#[test]
fn test_events_and_errors_reach_the_abi() {
    let output = compile(
        r#"
event Transfer(from: indexed address, to: indexed address, amount: u256);
error Underflow(have: u256, want: u256);

contract Token {
    total: u256;

    @external
    fn burn(amount: u256) {
        if (this.total < amount) {
            revert Underflow(this.total, amount);
        }
        this.total = this.total - amount;
        emit Transfer(msg.sender, msg.sender, amount);
    }
}
"#,
    );
    let src = &output.source;
    assert!(src.contains("emit_Transfer("));
    assert!(src.contains("revert_Underflow("));
    assert!(src.contains("= msg_sender();"));
    assert!(src.contains("runtime_log(\"Transfer(address,address,uint256)\""));

    let abi: serde_json::Value = serde_json::from_str(&output.abi).unwrap();
    let entries = abi.as_array().unwrap();
    let burn = entries
        .iter()
        .find(|e| e["name"] == "burn")
        .expect("burn in abi");
    assert_eq!(burn["type"], "function");
    assert_eq!(burn["stateMutability"], "nonpayable");
    assert!(burn["selector"].as_str().unwrap().starts_with("0x"));

    let event = entries
        .iter()
        .find(|e| e["type"] == "event")
        .expect("event in abi");
    assert_eq!(event["inputs"][0]["indexed"], true);
    assert_eq!(event["inputs"][2]["indexed"], false);

    assert!(entries.iter().any(|e| e["type"] == "error"));
}

#[test]
fn test_view_methods_are_marked_view() {
    let output = compile(COUNTER);
    let abi: serde_json::Value = serde_json::from_str(&output.abi).unwrap();
    let get = abi
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["name"] == "get")
        .expect("get in abi");
    assert_eq!(get["stateMutability"], "view");
    assert_eq!(get["outputs"][0]["type"], "uint256");
}

#[test]
fn test_generate_refuses_contracts_with_errors() {
    let analysis = analyze_source(
        r#"
contract Broken {
    @external
    fn run(): u256 {
        return missing;
    }
}
"#,
        "test.qz",
    );
    assert!(analysis.diagnostics.has_errors());
    let result = generate(
        &analysis.contract.expect("contract"),
        &analysis.diagnostics,
        "test.qz",
    );
    assert!(matches!(result, Err(CodegenError::HasErrors { .. })));
}

#[test]
fn test_constructor_runs_in_deploy() {
    let output = compile(
        r#"
contract Init {
    owner: address;
    value: u256;

    constructor(start: u256) {
        this.value = start;
    }
}
"#,
    );
    let src = &output.source;
    assert!(src.contains("void quartz_deploy(void) {"));
    assert!(src.contains("u256 a0 = calldata_word(0);"));
    assert!(src.contains("Init_constructor(a0);"));
}

#[test]
fn test_counter_abi_snapshot() {
    let output = compile(COUNTER);
    insta::assert_snapshot!(output.abi, @r###"
    [
      {
        "type": "function",
        "name": "increment",
        "visibility": "external",
        "inputs": [],
        "outputs": [],
        "stateMutability": "nonpayable",
        "selector": "0xd09de08a"
      },
      {
        "type": "function",
        "name": "get",
        "visibility": "view",
        "inputs": [],
        "outputs": [
          {
            "name": "",
            "type": "uint256"
          }
        ],
        "stateMutability": "view",
        "selector": "0x6d4ce63c"
      }
    ]
    "###);
}

#[test]
fn test_abi_distinguishes_external_from_public() {
    let output = compile(
        r#"
contract Wallet {
    total: u256;

    @external
    fn deposit(amount: u256) {
        this.total = this.total + amount;
    }

    @public
    fn shared() {
    }
}
"#,
    );
    let abi: serde_json::Value = serde_json::from_str(&output.abi).unwrap();
    let entries = abi.as_array().unwrap();
    let deposit = entries.iter().find(|e| e["name"] == "deposit").unwrap();
    let shared = entries.iter().find(|e| e["name"] == "shared").unwrap();
    assert_eq!(deposit["visibility"], "external");
    assert_eq!(shared["visibility"], "public");
    // Both are nonpayable, so only `visibility` tells them apart.
    assert_eq!(deposit["stateMutability"], shared["stateMutability"]);
}
