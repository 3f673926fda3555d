//! Tests for value construction, extraction and the container accessors.

use pretty_assertions::assert_eq;

use crate::managed::Managed;
use crate::symbol::symbol;
use crate::value::Value;

// ── Scalars ─────────────────────────────────────────────────────────────

#[test]
fn scalars_round_trip_through_their_tags() {
    assert_eq!(Value::int(42).as_int(), 42);
    assert_eq!(Value::float(2.5).as_float(), 2.5);
    assert_eq!(Value::from('q').as_char(), 'q');
    assert!(Value::from(true).as_bool());
    assert!(!Value::from(false).as_bool());
}

#[test]
fn integer_conversions_widen() {
    assert_eq!(Value::from(7i32).as_int(), 7);
    assert_eq!(Value::from(7i64).as_int(), 7);
}

#[test]
fn strings_round_trip_through_both_representations() {
    assert_eq!(Value::literal("static").as_str(), "static");
    assert_eq!(Value::string("heap").as_str(), "heap");
    assert_eq!(Value::from("from-literal").as_str(), "from-literal");
    assert_eq!(Value::from(String::from("from-owned")).as_str(), "from-owned");
}

#[test]
fn raw_pointers_round_trip() {
    let x = 5u8;
    let p = std::ptr::from_ref(&x).cast::<()>();
    assert_eq!(Value::raw(p).as_raw(), p);
    assert!(Value::null().as_raw().is_null());
}

#[test]
#[should_panic(expected = "contract violation")]
fn extracting_the_wrong_tag_is_a_contract_violation() {
    let _ = Value::from(true).as_int();
}

#[test]
#[should_panic(expected = "contract violation")]
fn extracting_a_string_from_an_int_is_a_contract_violation() {
    let _ = Value::int(1).as_str();
}

// ── Sharing ─────────────────────────────────────────────────────────────

#[test]
fn copies_share_the_heap_payload() {
    let a = Value::string("shared");
    let b = a.clone();
    match (&a, &b) {
        (Value::Str(x), Value::Str(y)) => assert!(Managed::ptr_eq(x, y)),
        _ => panic!("expected Str values"),
    }
}

#[cfg(not(feature = "traced"))]
#[test]
fn copies_bump_the_reference_count() {
    let a = Value::array([Value::int(1), Value::int(2)]);
    let handle = a.as_array();
    assert_eq!(Managed::strong_count(&handle), 2);
    let b = a.clone();
    assert_eq!(Managed::strong_count(&handle), 3);
    drop(b);
    assert_eq!(Managed::strong_count(&handle), 2);
}

// ── Invocation ──────────────────────────────────────────────────────────

fn double(v: &Value) -> Value {
    Value::int(v.as_int() * 2)
}

fn unit_effect() -> Value {
    Value::int(0)
}

#[test]
fn bare_code_pointers_are_callable() {
    let f = Value::function(double);
    assert_eq!(f.call(&Value::int(21)).as_int(), 42);

    let e = Value::eff_function(unit_effect);
    assert_eq!(e.call0().as_int(), 0);
}

#[test]
fn closures_capture_their_environment() {
    let offset = 10i64;
    let f = Value::closure(move |v| Value::int(v.as_int() + offset));
    assert_eq!(f.call(&Value::int(5)).as_int(), 15);
}

#[test]
fn eff_closures_rerun_on_every_call() {
    use std::cell::Cell;
    use std::rc::Rc;

    let runs = Rc::new(Cell::new(0i64));
    let counter = Rc::clone(&runs);
    let e = Value::eff_closure(move || {
        counter.set(counter.get() + 1);
        Value::int(counter.get())
    });
    assert_eq!(e.call0().as_int(), 1);
    assert_eq!(e.call0().as_int(), 2);
    assert_eq!(runs.get(), 2);
}

#[test]
fn a_thunk_resolving_to_a_callable_is_callable() {
    let f = Value::thunk(|| Value::function(double));
    assert_eq!(f.call(&Value::int(3)).as_int(), 6);
}

#[test]
#[should_panic(expected = "contract violation")]
fn calling_a_non_callable_is_a_contract_violation() {
    let _ = Value::int(1).call(&Value::int(2));
}

// ── Arrays ──────────────────────────────────────────────────────────────

#[test]
fn arrays_index_and_measure() {
    let a = Value::array([Value::int(10), Value::int(20), Value::int(30)]);
    assert_eq!(a.len(), 3);
    assert!(!a.is_empty());
    assert_eq!(a.index(0).as_int(), 10);
    assert_eq!(a.index(2).as_int(), 30);
    assert_eq!(a.index_value(&Value::int(1)).as_int(), 20);
}

#[test]
fn empty_arrays_are_representable() {
    let a = Value::array([]);
    assert_eq!(a.len(), 0);
    assert!(a.is_empty());
}

#[test]
fn cons_prepends_without_touching_the_original() {
    let tail = Value::array([Value::int(2), Value::int(3)]);
    let whole = Value::cons(Value::int(1), &tail);
    assert_eq!(whole.len(), 3);
    assert_eq!(whole.index(0).as_int(), 1);
    assert_eq!(tail.len(), 2);
    assert_eq!(tail.index(0).as_int(), 2);
}

#[test]
fn snoc_appends_without_touching_the_original() {
    let init = Value::array([Value::int(1)]);
    let whole = Value::snoc(&init, Value::int(2));
    assert_eq!(whole.len(), 2);
    assert_eq!(whole.index(1).as_int(), 2);
    assert_eq!(init.len(), 1);
}

#[test]
#[should_panic(expected = "contract violation")]
fn out_of_bounds_indexing_is_a_contract_violation() {
    let a = Value::array([Value::int(1)]);
    let _ = a.index(1);
}

#[test]
#[should_panic(expected = "contract violation")]
fn negative_runtime_indices_are_a_contract_violation() {
    let a = Value::array([Value::int(1)]);
    let _ = a.index_value(&Value::int(-1));
}

// ── Records ─────────────────────────────────────────────────────────────

#[test]
fn record_lookup_by_interned_key() {
    let r = Value::map([
        (symbol("x"), Value::int(1)),
        (symbol("y"), Value::int(2)),
    ]);
    assert_eq!(r.get(symbol("x")).as_int(), 1);
    assert_eq!(r.get(symbol("y")).as_int(), 2);
}

#[test]
fn record_membership_is_non_failing() {
    let r = Value::map([(symbol("present"), Value::int(1))]);
    assert!(r.contains(symbol("present")));
    assert!(!r.contains(symbol("absent")));
}

#[test]
fn empty_records_are_representable() {
    let r = Value::map([]);
    assert!(!r.contains(symbol("anything")));
}

#[test]
#[should_panic(expected = "contract violation")]
fn missing_record_keys_are_a_contract_violation() {
    let r = Value::map([(symbol("only"), Value::int(1))]);
    let _ = r.get(symbol("missing"));
}

// ── Data constructors ───────────────────────────────────────────────────

#[test]
fn data_fields_are_positional() {
    let d = Value::data([Value::int(2), Value::literal("payload")]);
    assert_eq!(d.ctor(), 2);
    assert_eq!(d.field(1).as_str(), "payload");
}

#[test]
fn copied_data_shares_its_fields() {
    let d = Value::data([Value::int(0), Value::string("once")]);
    let copy = d.clone();
    match (&d, &copy) {
        (Value::Data(x), Value::Data(y)) => assert!(Managed::ptr_eq(x, y)),
        _ => panic!("expected Data values"),
    }
}

#[test]
#[should_panic(expected = "contract violation")]
fn data_field_arity_overrun_is_a_contract_violation() {
    let d = Value::data([Value::int(0)]);
    let _ = d.field(1);
}

// ── Boxed objects ───────────────────────────────────────────────────────

#[test]
fn boxed_objects_round_trip_through_downcast() {
    struct FileHandle {
        fd: i32,
    }

    let v = Value::boxed(FileHandle { fd: 3 });
    assert_eq!(v.as_boxed().get::<FileHandle>().fd, 3);
    assert!(v.as_boxed().downcast_ref::<String>().is_none());
}

#[test]
#[should_panic(expected = "contract violation")]
fn boxed_extraction_with_the_wrong_type_is_a_contract_violation() {
    let v = Value::boxed(5u8);
    let _ = v.as_boxed().get::<String>();
}

// ── Forcing through accessors ───────────────────────────────────────────

#[test]
fn container_accessors_force_their_operand() {
    let a = Value::thunk(|| Value::array([Value::int(1)]));
    assert_eq!(a.len(), 1);
    assert_eq!(a.index(0).as_int(), 1);

    let r = Value::thunk(|| Value::map([(symbol("k"), Value::int(9))]));
    assert_eq!(r.get(symbol("k")).as_int(), 9);

    let d = Value::thunk(|| Value::data([Value::int(4)]));
    assert_eq!(d.ctor(), 4);
}

// ── Debug formatting ────────────────────────────────────────────────────

#[test]
fn debug_output_names_the_tag() {
    assert_eq!(format!("{:?}", Value::int(1)), "Int(1)");
    assert_eq!(format!("{:?}", Value::literal("s")), "StrLit(\"s\")");
    assert_eq!(
        format!("{:?}", Value::map([(symbol("k"), Value::int(1))])),
        "Map{k: Int(1)}"
    );
}
