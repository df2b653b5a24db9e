use demos::{PingClient, ping_box, relay_ping, sys_ping};
use runtime::{BoxSpec, BoxState, Runtime};

fn main() {
    let mut rt = Runtime::new();
    rt.verbose = true;

    let b1 = rt.register(BoxSpec::new("box1", ping_box(1)).with_import(sys_ping()));
    let b2 = rt.register(BoxSpec::new("box2", ping_box(2)).with_import(relay_ping(b1)));
    let b3 = rt.register(BoxSpec::new("box3", ping_box(3)).with_import(relay_ping(b2)));
    let box1 = PingClient::new(b1);
    let box2 = PingClient::new(b2);
    let box3 = PingClient::new(b3);

    box1.hello(&mut rt);
    box2.hello(&mut rt);
    box3.hello(&mut rt);

    for a in 1..4 {
        println!("box1.ping({a}) = {}", box1.ping(&mut rt, a));
        println!("box2.ping({a}) = {}", box2.ping(&mut rt, a));
        println!("box3.ping({a}) = {}", box3.ping(&mut rt, a));
    }

    // an abort tears box2 down; the next crossing brings it back
    println!("box2.ping_abort(0) = {}", box2.ping_abort(&mut rt, 0));
    assert_eq!(rt.state(b2), BoxState::Unloaded);
    println!("box2.ping(3) = {}", box2.ping(&mut rt, 3));

    // box3 relays through box2, box2 through box1, box1 answers with the
    // identity relay
    println!("box1.ping_import(10) = {}", box1.ping_import(&mut rt, 10));
    println!("box2.ping_import(10) = {}", box2.ping_import(&mut rt, 10));
    println!("box3.ping_import(10) = {}", box3.ping_import(&mut rt, 10));
}
