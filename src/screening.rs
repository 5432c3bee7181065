//! Edinburgh Postnatal Depression Scale questionnaire.
//!
//! Ten questions, four ordered answers each, scored by answer position
//! (0..=3). A total of 10 or more is treated as high risk.

use thiserror::Error;

pub const HIGH_RISK_THRESHOLD: u8 = 10;

pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
}

pub static QUESTIONS: [Question; 10] = [
    Question {
        prompt: "I have been able to laugh and see the funny side of things",
        options: ["As much as I always could", "Not quite so much now", "Definitely not so much now", "Not at all"],
    },
    Question {
        prompt: "I have looked forward with enjoyment to things",
        options: ["As much as I ever did", "Rather less than I used to", "Definitely less than I used to", "Hardly at all"],
    },
    Question {
        prompt: "I have blamed myself unnecessarily when things went wrong",
        options: ["No, never", "Not very often", "Yes, some of the time", "Yes, most of the time"],
    },
    Question {
        prompt: "I have been anxious or worried for no good reason",
        options: ["No, not at all", "Hardly ever", "Yes, sometimes", "Yes, very often"],
    },
    Question {
        prompt: "I have felt scared or panicky for no very good reason",
        options: ["No, not at all", "No, not much", "Yes, sometimes", "Yes, quite a lot"],
    },
    Question {
        prompt: "Things have been getting on top of me",
        options: ["No, I've been coping as well as ever", "No, most of the time I cope well", "Yes, sometimes I haven't been coping", "Yes, most of the time I can't cope"],
    },
    Question {
        prompt: "I have been so unhappy that I have had difficulty sleeping",
        options: ["No, not at all", "Not very often", "Yes, sometimes", "Yes, most of the time"],
    },
    Question {
        prompt: "I have felt sad or miserable",
        options: ["No, not at all", "Not very often", "Yes, quite often", "Yes, most of the time"],
    },
    Question {
        prompt: "I have been so unhappy that I have been crying",
        options: ["No, never", "Only occasionally", "Yes, quite often", "Yes, most of the time"],
    },
    Question {
        prompt: "The thought of harming myself has occurred to me",
        options: ["Never", "Hardly ever", "Sometimes", "Yes, quite often"],
    },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreeningError {
    #[error("answer {0} is out of range (expected 0..=3)")]
    InvalidAnswer(usize),
    #[error("screening is already complete")]
    AlreadyComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreeningResult {
    pub total: u8,
    pub high_risk: bool,
}

/// Answers collected so far, in question order.
#[derive(Debug, Clone, Default)]
pub struct Screening {
    answers: Vec<u8>,
}

impl Screening {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        QUESTIONS.get(self.answers.len())
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == QUESTIONS.len()
    }

    pub fn answer(&mut self, option: usize) -> Result<(), ScreeningError> {
        if self.is_complete() {
            return Err(ScreeningError::AlreadyComplete);
        }
        let score = u8::try_from(option)
            .ok()
            .filter(|s| *s <= 3)
            .ok_or(ScreeningError::InvalidAnswer(option))?;
        self.answers.push(score);
        Ok(())
    }

    /// `None` until every question is answered.
    pub fn result(&self) -> Option<ScreeningResult> {
        if !self.is_complete() {
            return None;
        }
        let total: u8 = self.answers.iter().sum();
        Some(ScreeningResult {
            total,
            high_risk: total >= HIGH_RISK_THRESHOLD,
        })
    }
}
