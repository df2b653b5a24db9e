use std::cell::RefCell;
use std::rc::Rc;

use boxlib::FmtArg;
use runtime::{BoxId, Env, ExportTable, ImportFn, ImportTable, Runtime};
use types::{Error, ExportSlot, ImportSlot, Word};

/// Export slots of a ping box. Fixed at build time; `PingClient` is the
/// matching caller side.
pub const HELLO: ExportSlot = ExportSlot(1);
pub const PING: ExportSlot = ExportSlot(2);
pub const PING_ABORT: ExportSlot = ExportSlot(3);
pub const PING_IMPORT: ExportSlot = ExportSlot(4);

/// Import slot of the environment's ping relay, used by `PING_IMPORT`.
pub const SYS_PING: ImportSlot = ImportSlot(ImportSlot::EXTRA_BASE);

struct PingState {
    n: Word,
    imports: Option<Rc<ImportTable>>,
}

impl PingState {
    fn imports(&self) -> Rc<ImportTable> {
        // post-init always runs before any other export
        Rc::clone(self.imports.as_ref().expect("post-init ran"))
    }
}

/// Build the export table of a ping box parameterized by `n`.
///
/// The box answers `ping(a)` with `a + n`, aborts with code `-n` when asked
/// to ping zero, and relays through the `SYS_PING` import when asked to ping
/// via its environment.
pub fn ping_box(n: Word) -> ExportTable {
    let state = Rc::new(RefCell::new(PingState { n, imports: None }));

    let st = Rc::clone(&state);
    let mut exports = ExportTable::new(Box::new(move |_env, imports| {
        st.borrow_mut().imports = Some(imports);
        0
    }));

    let st = Rc::clone(&state);
    exports.push(Box::new(move |env, _args| {
        let (n, imports) = {
            let st = st.borrow();
            (st.n, st.imports())
        };
        boxlib::printf(env, &imports, "box%d says hello!\n", &[FmtArg::Int(n)]);
        0
    }));

    let st = Rc::clone(&state);
    exports.push(Box::new(move |_env, args| {
        args[0].wrapping_add(st.borrow().n)
    }));

    let st = Rc::clone(&state);
    exports.push(Box::new(move |env, args| {
        let (n, imports) = {
            let st = st.borrow();
            (st.n, st.imports())
        };
        if args[0] == 0 {
            imports.abort(env, -n);
        }
        boxlib::printf(
            env,
            &imports,
            "box%d survived ping_abort(%d)\n",
            &[FmtArg::Int(n), FmtArg::Int(args[0])],
        );
        n
    }));

    let st = Rc::clone(&state);
    exports.push(Box::new(move |env, args| {
        let (n, imports) = {
            let st = st.borrow();
            (st.n, st.imports())
        };
        imports.call(env, SYS_PING, &[args[0]]).wrapping_add(n)
    }));

    exports
}

/// The identity relay: `sys_ping(a) = a`.
pub fn sys_ping() -> ImportFn {
    Rc::new(|_env: &mut Env, args: &[Word]| args[0])
}

/// A relay that forwards `sys_ping` into another box's `PING` export. The
/// target must already be registered, so relays only point backwards.
pub fn relay_ping(target: BoxId) -> ImportFn {
    Rc::new(move |env: &mut Env, args: &[Word]| env.cross(target, PING, args))
}

/// Caller-side view of a ping box: one method per export slot, raw wire
/// results except where noted.
pub struct PingClient {
    id: BoxId,
}

impl PingClient {
    pub fn new(id: BoxId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    pub fn hello(&self, rt: &mut Runtime) -> Word {
        rt.call_raw(self.id, HELLO, &[])
    }

    pub fn ping(&self, rt: &mut Runtime, a: Word) -> Word {
        rt.call_raw(self.id, PING, &[a])
    }

    /// Like `ping`, but negative words come back as typed errors.
    pub fn try_ping(&self, rt: &mut Runtime, a: Word) -> Result<Word, Error> {
        rt.call(self.id, PING, &[a])
    }

    pub fn ping_abort(&self, rt: &mut Runtime, a: Word) -> Word {
        rt.call_raw(self.id, PING_ABORT, &[a])
    }

    pub fn ping_import(&self, rt: &mut Runtime, a: Word) -> Word {
        rt.call_raw(self.id, PING_IMPORT, &[a])
    }
}
