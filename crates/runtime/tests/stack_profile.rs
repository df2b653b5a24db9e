use runtime::{BoxSpec, ExportTable, Runtime};

fn leaf_box() -> ExportTable {
    let mut exports = ExportTable::new(Box::new(|_env, _imports| 0));
    exports.push(Box::new(|_env, args| args[0]));
    exports
}

#[test]
fn minimal_profile_push_always_fails() {
    let mut rt = Runtime::new();
    let id = rt.register(BoxSpec::new("box1", leaf_box()));

    assert_eq!(rt.stack_push(id, 64), None);
    assert_eq!(rt.stack_push(id, 0), None);
    assert_eq!(rt.stack_free(id), None);
}

#[test]
#[should_panic(expected = "minimal profile")]
fn minimal_profile_pop_is_fatal() {
    let mut rt = Runtime::new();
    let id = rt.register(BoxSpec::new("box1", leaf_box()));
    rt.stack_pop(id, 64);
}

#[test]
fn stack_bearing_profile_push_pop_round_trip() {
    let mut rt = Runtime::new();
    let id = rt.register(BoxSpec::new("box1", leaf_box()).with_stack(128));

    let before = rt.stack_free(id).expect("region configured");
    let offset = rt.stack_push(id, 64).expect("fits");
    assert_eq!(offset, 0);
    rt.stack_pop(id, 64);
    assert_eq!(rt.stack_free(id), Some(before));
}

#[test]
fn stack_overflow_is_an_allocation_failure_not_a_fault() {
    let mut rt = Runtime::new();
    let id = rt.register(BoxSpec::new("box1", leaf_box()).with_stack(32));

    assert_eq!(rt.stack_push(id, 64), None);
    assert_eq!(rt.stack_push(id, usize::MAX), None);
    // the failed pushes changed nothing
    assert_eq!(rt.stack_free(id), Some(32));
}
