#![no_main]

use chordring_dht::{FingerTable, IdSpace, ReplicationManager, RingMembership};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Ring operations must never panic on arbitrary id sequences

    let Some((&bits, ops)) = data.split_first() else {
        return;
    };

    let space = match IdSpace::new(u32::from(bits % 16)) {
        Ok(space) => space,
        Err(_) => return,
    };
    let mut ring = RingMembership::new(space);
    let replication = match ReplicationManager::new(3) {
        Ok(manager) => manager,
        Err(_) => return,
    };

    // Each op is a tag byte followed by one id byte
    for chunk in ops.chunks_exact(2) {
        let id = u64::from(chunk[1]);
        match chunk[0] % 4 {
            0 => {
                let _ = ring.add(id);
            }
            1 => {
                let _ = ring.remove(id);
            }
            2 => {
                let _ = replication.replica_set(&ring, id);
            }
            _ => {
                if let Ok(owner) = ring.successor_of(id) {
                    assert!(ring.contains(owner));
                    let table = FingerTable::build(owner, &ring).expect("non-empty ring");
                    assert_eq!(table.len(), space.bits() as usize);
                }
            }
        }
    }

    // Members must stay strictly ascending
    let members: Vec<u64> = ring.iter().collect();
    assert!(members.windows(2).all(|w| w[0] < w[1]));
});
