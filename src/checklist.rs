//! Post-admission checklist: a fixed, linear walkthrough.
//!
//! Submitting a step only flashes its confirmation and moves on; nothing is
//! stored, so any step can be revisited.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecklistStep {
    I20,
    Visa,
    Travel,
    PostArrival,
    Subjects,
}

impl ChecklistStep {
    /// Steps served by the checklist pages, in order. `Subjects` belongs to the grade log.
    pub const PAGES: [Self; 4] = [Self::I20, Self::Visa, Self::Travel, Self::PostArrival];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::I20 => "/i20-process",
            Self::Visa => "/visa-process",
            Self::Travel => "/travel-ready",
            Self::PostArrival => "/post-arrival-guide",
            Self::Subjects => "/subjects",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::I20 => "I-20 & SEVIS Fee",
            Self::Visa => "Visa Process",
            Self::Travel => "Travel Ready",
            Self::PostArrival => "Post-Arrival Guide",
            Self::Subjects => "Subjects & Grades",
        }
    }

    /// Bullet points shown on the step page.
    #[must_use]
    pub const fn tasks(self) -> &'static [&'static str] {
        match self {
            Self::I20 => &[
                "Receive your I-20 from the university",
                "Check name, program and dates on the I-20",
                "Pay the SEVIS I-901 fee and keep the receipt",
            ],
            Self::Visa => &[
                "Fill in the DS-160 form",
                "Pay the visa application fee",
                "Book and attend the visa interview",
            ],
            Self::Travel => &[
                "Book flights to arrive no earlier than 30 days before the program start",
                "Pack the I-20, passport, visa and financial documents in your carry-on",
                "Arrange housing for the first weeks",
            ],
            Self::PostArrival => &[
                "Report to the international student office",
                "Open a bank account and get a local phone number",
                "Register for classes",
            ],
            Self::Subjects => &["Record your subjects and grades each semester"],
        }
    }

    /// Confirmation flashed when the step is submitted.
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::I20 => "I-20 & SEVIS step marked as complete.",
            Self::Visa => "Visa process step marked as complete.",
            Self::Travel => "You're all packed and ready to go!",
            Self::PostArrival => "Post-arrival step marked complete!",
            Self::Subjects => "Subject & grade added!",
        }
    }

    /// Next step, or `None` at the end of the walkthrough.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::I20 => Some(Self::Visa),
            Self::Visa => Some(Self::Travel),
            Self::Travel => Some(Self::PostArrival),
            Self::PostArrival => Some(Self::Subjects),
            Self::Subjects => None,
        }
    }
}
