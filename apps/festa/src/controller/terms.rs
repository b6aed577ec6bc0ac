#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermsEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const TERMS: [TermsEntry; 3] = [
    TermsEntry {
        question: "What information do I need to provide?",
        answer: "Using the festival service requires your student id, \
                 your student portal password and your phone number.",
    },
    TermsEntry {
        question: "What is the information used for?",
        answer: "It is used only to provide the festival service and for no other purpose.",
    },
    TermsEntry {
        question: "Do I really have to give my portal password?",
        answer: "The portal password is used only to confirm enrollment and is deleted immediately.",
    },
];

/// Content of the consent sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermsSheet {
    pub entries: &'static [TermsEntry],
    pub confirm_loading: bool,
}

impl Default for TermsSheet {
    fn default() -> Self {
        Self {
            entries: &TERMS,
            confirm_loading: false,
        }
    }
}
