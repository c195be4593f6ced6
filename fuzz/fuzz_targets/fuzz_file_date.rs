#![no_main]

use fwsift::selector::parse_file_date;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|name: &str| {
    if let Some(date) = parse_file_date(name) {
        assert!(name.ends_with(".gz"));
        let suffix = date.format(".%d.%m.%y.gz").to_string();
        assert!(name.ends_with(&suffix));
    }
});
