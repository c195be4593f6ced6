#![no_main]

use chrono::NaiveDate;
use fwsift::extract::{FieldExtractor, date_column};
use fwsift::types::FieldLayout;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);
    let Some(date) = NaiveDate::from_ymd_opt(2025, 3, 24).map(date_column) else {
        return;
    };

    for layout in [FieldLayout::Standard, FieldLayout::WithSubtype] {
        let Ok(extractor) = FieldExtractor::new(layout) else {
            return;
        };
        let record = extractor.extract(&line, &date);
        assert_eq!(record.values().len(), layout.len());
        assert!(record.values().iter().all(|v| !v.contains(char::is_whitespace)));
    }
});
