#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing must never panic or read out of bounds; when it succeeds,
    // neither must the renderer or the symbol walk.
    if let Ok(image) = elendil::ElfImage::parse(data) {
        let _ = elendil::render(&image);
        if let Ok(Some(table)) = image.find_symbol_table() {
            for entry in table.entries().iter().flatten() {
                let _ = table.name_of(&entry);
            }
        }
    }
});
