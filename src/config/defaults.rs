// src/config/defaults.rs
//! Built-in seed vocabularies. Used when no `config/annotator.toml` is found,
//! and as the per-section fallback for sections a config file leaves out.

use crate::aspects::Aspect;
use crate::diet::Diet;
use std::collections::BTreeMap;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub(crate) fn negation_cues() -> Vec<String> {
    owned(&["no", "nunca", "jamás", "tampoco"])
}

pub(crate) fn scope_resets() -> Vec<String> {
    // Contrast connectors only: punctuation inside a window is counted and marked,
    // and the clause splitter needs `pero`/`aunque` unmarked.
    owned(&["pero", "aunque"])
}

pub(crate) fn diet_patterns() -> BTreeMap<Diet, Vec<String>> {
    let mut m = BTreeMap::new();
    m.insert(
        Diet::Ayuno,
        owned(&[
            r"\bayuno\b",
            r"\bintermitente\b",
            r"\b16/8\b",
            r"\b18/6\b",
            r"\bOMAD\b",
            r"\buna\s*comida\s*al\s*d[ií]a\b",
        ]),
    );
    m.insert(
        Diet::Keto,
        owned(&[
            r"\bketo\b",
            r"\bcetog(e|é)nica\b",
            r"\blow\s*carb\b",
            r"\bcetosis\b",
        ]),
    );
    m.insert(
        Diet::Flexible,
        owned(&[
            r"\bflexible\b",
            r"\bIIFYM\b",
            r"\bcontar\s*macros\b",
            r"\bmacros\b",
        ]),
    );
    m.insert(
        Diet::Mediterranea,
        owned(&[
            r"\bmediterr(a|á)nea\b",
            r"\balimentaci[oó]n\s*mediterr(a|á)nea\b",
            r"\bpatr[oó]n\s*mediterr[aá]neo\b",
        ]),
    );
    m.insert(
        Diet::Paleo,
        owned(&[r"\bpaleo\b", r"\bpaleol[ií]tica\b", r"\bprimal\b"]),
    );
    m.insert(
        Diet::Vegana,
        owned(&[
            r"\bvegana\b",
            r"\bvegano\b",
            r"\bvegetariana\b",
            r"\bplant\s*based\b",
        ]),
    );
    m
}

pub(crate) fn positive_lexicon() -> Vec<String> {
    owned(&[
        "recomiendo",
        "recomendable",
        "me_encantar",
        "me_encanto",
        "me encantó",
        "me encanto",
        "excelente",
        "funcionar",
        "me_funciono",
        "me funcionó",
        "me_fue_bien",
        "me fue bien",
        "mejorar",
        "progreso",
        "genial",
        "buenisimo",
        "buenísimo",
        "bueno",
        "efectivo",
        "eficaz",
        ":smile:",
        ":muscle:",
        ":fire:",
        ":thumbsup:",
        ":+1:",
        ":grinning:",
        ":heart:",
    ])
}

pub(crate) fn negative_lexicon() -> Vec<String> {
    owned(&[
        "horrible",
        "malo",
        "pesimo",
        "pésimo",
        "fatal",
        "terrible",
        "fracaso",
        "mareo",
        "dolor",
        "ansiedad",
        "no_recomendar",
        "no_recomiendo",
        "no_servir",
        "no_sirve",
        "no_funcionar",
        "no_funciona",
        "no_bueno",
        "no_efectivo",
        "abandono",
        "difícil",
        "dificil",
        "imposible",
        "caro",
        "cara",
        "caros",
        "caras",
        "carísimo",
        "carisimo",
        ":cry:",
        ":thumbsdown:",
        ":-1:",
        ":angry:",
        ":weary:",
        ":frowning:",
    ])
}

pub(crate) fn intensifiers() -> Vec<String> {
    owned(&["muy", "super", "súper", "bastante", "demasiado", "re_muy"])
}

pub(crate) fn attenuators() -> Vec<String> {
    owned(&["un_poco", "un poco", "algo", "ligeramente"])
}

pub(crate) fn contrast_connectors() -> Vec<String> {
    owned(&["pero", "aunque", "sin embargo", "no obstante"])
}

pub(crate) fn aspect_lexicons() -> BTreeMap<Aspect, Vec<String>> {
    let mut m = BTreeMap::new();
    m.insert(
        Aspect::Hambre,
        owned(&[
            "hambre", "apetito", "antojo", "antojos", "saciedad", "ansia", "craving", "cravings",
            "picoteo",
        ]),
    );
    m.insert(
        Aspect::Energia,
        owned(&[
            "energía",
            "energia",
            "fatiga",
            "cansancio",
            "vitalidad",
            "ánimo",
            "animo",
            "sueño",
            "sueno",
        ]),
    );
    m.insert(
        Aspect::Adherencia,
        owned(&[
            "adherencia",
            "sostener",
            "sostenible",
            "abandono",
            "constancia",
            "rutina",
            "compromiso",
            "seguir",
            "seguimiento",
        ]),
    );
    m.insert(
        Aspect::Costo,
        owned(&[
            "caro", "cara", "carísimo", "carisimo", "costoso", "barato", "precio", "gasto",
        ]),
    );
    m.insert(
        Aspect::Social,
        owned(&[
            "social",
            "salir",
            "eventos",
            "reunión",
            "reunion",
            "familia",
            "amigos",
            "restaurante",
            "fiesta",
        ]),
    );
    m
}
