use std::cell::Cell;
use std::rc::Rc;

use runtime::{BoxSpec, BoxState, ExportTable, Runtime};
use types::{Error, ExportSlot, Word};

const PING: ExportSlot = ExportSlot(1);

/// A box whose ping export returns `a0 + n`, counting post-init runs.
fn counted_box(n: Word, postinits: Rc<Cell<u32>>) -> ExportTable {
    let mut exports = ExportTable::new(Box::new(move |_env, _imports| {
        postinits.set(postinits.get() + 1);
        0
    }));
    exports.push(Box::new(move |_env, args| args[0] + n));
    exports
}

#[test]
fn cold_call_runs_load_and_postinit_once() {
    let mut rt = Runtime::new();
    let loads = Rc::new(Cell::new(0u32));
    let posts = Rc::new(Cell::new(0u32));

    let counter = Rc::clone(&loads);
    let id = rt.register(
        BoxSpec::new("box1", counted_box(2, Rc::clone(&posts))).with_loader(Box::new(move || {
            counter.set(counter.get() + 1);
            Ok(())
        })),
    );

    assert_eq!(rt.state(id), BoxState::Unloaded);
    assert_eq!(rt.call_raw(id, PING, &[5]), 7);
    assert_eq!(loads.get(), 1);
    assert_eq!(posts.get(), 1);
    assert_eq!(rt.state(id), BoxState::Initialized);

    // warm calls do not re-run the cycle
    assert_eq!(rt.call_raw(id, PING, &[1]), 3);
    assert_eq!(loads.get(), 1);
    assert_eq!(posts.get(), 1);
}

#[test]
fn init_is_idempotent() {
    let mut rt = Runtime::new();
    let posts = Rc::new(Cell::new(0u32));
    let id = rt.register(BoxSpec::new("box1", counted_box(1, Rc::clone(&posts))));

    rt.init(id).unwrap();
    rt.init(id).unwrap();
    assert_eq!(posts.get(), 1);
    assert_eq!(rt.state(id), BoxState::Initialized);
}

#[test]
fn load_failure_leaves_box_unloaded() {
    let mut rt = Runtime::new();
    let posts = Rc::new(Cell::new(0u32));
    let broken = Rc::new(Cell::new(true));

    let flag = Rc::clone(&broken);
    let id = rt.register(
        BoxSpec::new("box1", counted_box(2, Rc::clone(&posts))).with_loader(Box::new(move || {
            if flag.get() { Err(Error::NoExec) } else { Ok(()) }
        })),
    );

    // load fails: no post-init runs, error comes back through the gate
    assert_eq!(rt.call_raw(id, PING, &[5]), Error::NoExec.to_word());
    assert_eq!(rt.state(id), BoxState::Unloaded);
    assert_eq!(posts.get(), 0);

    // the runtime never retries internally, but the caller may
    broken.set(false);
    assert_eq!(rt.call_raw(id, PING, &[5]), 7);
    assert_eq!(posts.get(), 1);
}

#[test]
fn postinit_failure_leaves_box_unloaded() {
    let mut rt = Runtime::new();
    let mut exports = ExportTable::new(Box::new(|_env, _imports| Error::Acces.to_word()));
    exports.push(Box::new(|_env, _args| 0));
    let id = rt.register(BoxSpec::new("box1", exports));

    assert_eq!(rt.init(id), Err(Error::Acces));
    assert_eq!(rt.state(id), BoxState::Unloaded);
}

#[test]
fn postinit_abort_comes_back_as_init_error() {
    let mut rt = Runtime::new();
    let mut exports = ExportTable::new(Box::new(|env, _imports| {
        env.abort(Error::Fault.to_word())
    }));
    exports.push(Box::new(|_env, _args| 0));
    let id = rt.register(BoxSpec::new("box1", exports));

    assert_eq!(rt.init(id), Err(Error::Fault));
    assert_eq!(rt.state(id), BoxState::Unloaded);
    assert_eq!(rt.active_checkpoint(id), None);
}

#[test]
fn clobber_forces_reinit_without_running_box_code() {
    let mut rt = Runtime::new();
    let posts = Rc::new(Cell::new(0u32));
    let id = rt.register(BoxSpec::new("box1", counted_box(2, Rc::clone(&posts))));

    rt.init(id).unwrap();
    assert_eq!(rt.state(id), BoxState::Initialized);
    assert_eq!(posts.get(), 1);

    rt.clobber(id);
    assert_eq!(rt.state(id), BoxState::Unloaded);
    assert_eq!(posts.get(), 1); // clobber itself ran nothing

    assert_eq!(rt.call_raw(id, PING, &[5]), 7);
    assert_eq!(posts.get(), 2);
}
