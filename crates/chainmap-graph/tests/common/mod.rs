use chainmap_core::{Signature, WormholeLink};

pub fn sig(id: &str, system_id: &str, code: &str) -> Signature {
    Signature {
        id: id.to_string(),
        signature_code: Some(code.to_string()),
        system_id: system_id.to_string(),
        type_tag: "wormhole".to_string(),
        name: String::new(),
        created_by_id: String::new(),
    }
}

pub fn link(id: &str, initial: &str, secondary: &str) -> WormholeLink {
    WormholeLink {
        id: id.to_string(),
        initial_signature_id: initial.to_string(),
        secondary_signature_id: secondary.to_string(),
    }
}
