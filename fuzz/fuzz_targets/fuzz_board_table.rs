//! Fuzz target: `BoardTable` decoding
//!
//! Feeds arbitrary bytes to both decoders and verifies:
//! - No panics on malformed JSON or postcard input
//! - Decoded tables never exceed `MAX_LEDS`
//! - A decoded table re-encodes to a blob that decodes to the same table
//!
//! cargo fuzz run fuzz_board_table

#![no_main]

use libfuzzer_sys::fuzz_target;
use ledfsm::led::{BoardTable, MAX_LEDS};

fuzz_target!(|data: &[u8]| {
    for table in [BoardTable::from_json(data), BoardTable::from_postcard(data)]
        .into_iter()
        .flatten()
    {
        assert!(table.len() <= MAX_LEDS);
        let blob = table.to_postcard().unwrap();
        assert_eq!(BoardTable::from_postcard(&blob).unwrap(), table);
    }
});
