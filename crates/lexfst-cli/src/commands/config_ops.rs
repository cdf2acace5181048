use std::fs;

pub fn settings_export() {
    print!("{}", lexfst_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        lexfst_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: decoder.beam_size={}, lexicon.unknown_policy={}, lexicon.unknown_factor={}",
        s.decoder.beam_size,
        s.lexicon.unknown_policy(),
        s.lexicon.unknown_factor
    );
}

/// Install a settings file before any command reads the defaults.
pub fn load_settings(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(
        lexfst_core::settings::init_custom(content),
        "Error in {file}: {}"
    );
}
