//! Recycles one reusable type through two reuse cases, printing the properties after each
//! acquisition.
//!
//! Set `RUST_LOG=capability_pool=trace` to see every acquire and release.

use capability_pool::record::{FirstCase, Record, SecondCase};
use capability_pool::{CapabilityPool, Initialized};
use tracing_subscriber::EnvFilter;

const ROUNDS: u32 = 3;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let first_pool = CapabilityPool::<dyn FirstCase>::with_default_policy::<Record>();
    let second_pool = CapabilityPool::<dyn SecondCase>::with_default_policy::<Record>();

    for round in 0..ROUNDS {
        println!("[Reuse case I]");
        let record = first_pool
            .acquire_and_initialize::<Record>(|case| {
                case.set_property1(format!("A{round}"));
                case.set_property2(format!("B{round}"));
                Initialized::Done
            })
            .expect("creating a default record cannot fail")
            .expect("the pool only holds records");
        println!("{}", *record);
        first_pool.release(record);
        println!("-> returned to the first pool\n");

        println!("[Reuse case II]");
        let record = second_pool
            .acquire_and_initialize::<Record>(|case| {
                case.set_property3(format!("C{round}"));
                case.set_property4(format!("D{round}"));
                Initialized::Done
            })
            .expect("creating a default record cannot fail")
            .expect("the pool only holds records");
        println!("{}", *record);
        second_pool.release(record);
        println!("-> returned to the second pool\n");
    }

    println!(
        "Retained after {ROUNDS} rounds: {} in the first pool, {} in the second pool",
        first_pool.retained(),
        second_pool.retained()
    );
}
