use honggfuzz::fuzz;
use spt::{decode_form, ClassRow, SoundClassTable};

fn main() {
    let Ok(classes) = SoundClassTable::build(&[
        ClassRow::new("Hʔh", "Laryngeals"),
        ClassRow::new("Vaeiou", "Vowels and features"),
        ClassRow::new("jy", "Glides"),
        ClassRow::new("w", "Labial glides"),
        ClassRow::new("Pbpf", "Labials"),
        ClassRow::new("Tdt", "Dentals"),
        ClassRow::new("Kgkx", "Velars"),
    ]) else {
        return;
    };
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(raw) = std::str::from_utf8(data) {
                let set = decode_form(&classes, raw);
                assert_eq!(set.clean_forms.len(), set.decoded_forms.len());
                for skeleton in &set.decoded_forms {
                    assert_ne!(skeleton.chars().count(), 1);
                }
            }
        });
    }
}
