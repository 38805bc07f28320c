use quickcheck::quickcheck;
use spt::decoder::encode_skeleton;
use spt::{decode_form, ClassRow, SoundClassTable};

fn classes() -> SoundClassTable {
    SoundClassTable::build(&[
        ClassRow::new("Hʔh", "Laryngeals"),
        ClassRow::new("Vaeiou", "Vowels and features"),
        ClassRow::new("jy", "Glides"),
        ClassRow::new("w", "Labial glides"),
        ClassRow::new("Pbpf", "Labials"),
        ClassRow::new("Tdt", "Dentals"),
        ClassRow::new("Kgkx", "Velars"),
        ClassRow::new("Mm", "Nasal labial"),
        ClassRow::new("Nn", "Nasal dental"),
        ClassRow::new("Rrl", "Liquids"),
    ])
    .unwrap()
}

quickcheck! {
    fn skeleton_never_single_symbol(form: String) -> bool {
        encode_skeleton(&classes(), &form).chars().count() != 1
    }

    fn skeleton_uses_class_codes_only(form: String) -> bool {
        let table = classes();
        let codes = table.codes();
        let skeleton = encode_skeleton(&table, &form);
        skeleton.chars().all(|c| codes.contains(&c))
    }

    fn decoded_alternatives_stay_aligned(raw: String) -> bool {
        let table = classes();
        let set = decode_form(&table, &raw);
        set.clean_forms.len() == set.decoded_forms.len()
            && set.decoded_forms.iter().all(|d| d.chars().count() != 1)
            && set.broomed_symbols.iter().all(|&c| !table.is_known(c))
    }
}
