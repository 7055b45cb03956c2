//! Checklist answer normalization
//!
//! Turns (factor, chosen side) pairs into signed contributions:
//!     +weight  answer favours the home side
//!     -weight  answer favours the away side
//!      0       neither side
//!
//! Adverse factors ("which team has more injuries?") flip the chosen side
//! before signing, so the team picked is the one that loses weight.

use std::collections::{HashMap, HashSet};

use crate::error::{validate_weight, EngineError};
use crate::models::{Answer, Contribution, Factor, Side};

/// Normalize answers into signed contributions, in answer order
///
/// Factors without an answer contribute nothing. Fails on checklists that
/// repeat a factor name, on answers naming an unknown factor or answering a
/// factor twice, and on sides the factor's polarity does not permit.
///
/// # Examples
/// ```
/// use matchedge::core::checklist::normalize;
/// use matchedge::models::{Answer, Factor, Side};
///
/// let factors = vec![Factor::new("Recent form", 5.0), Factor::new("Injuries", 4.0).adverse()];
/// let answers = vec![Answer::new("Recent form", Side::Home), Answer::new("Injuries", Side::Home)];
/// let contributions = normalize(&factors, &answers).unwrap();
/// assert_eq!(contributions[0].value, 5.0);
/// assert_eq!(contributions[1].value, -4.0);
/// ```
pub fn normalize(factors: &[Factor], answers: &[Answer]) -> Result<Vec<Contribution>, EngineError> {
    let mut by_name: HashMap<&str, &Factor> = HashMap::with_capacity(factors.len());
    for factor in factors {
        validate_weight(&factor.name, factor.weight)?;
        if by_name.insert(factor.name.as_str(), factor).is_some() {
            return Err(EngineError::DuplicateFactor(factor.name.clone()));
        }
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(answers.len());
    let mut contributions = Vec::with_capacity(answers.len());

    for answer in answers {
        let factor = by_name
            .get(answer.factor.as_str())
            .ok_or_else(|| EngineError::UnknownFactor(answer.factor.clone()))?;

        if !seen.insert(answer.factor.as_str()) {
            return Err(EngineError::DuplicateAnswer(answer.factor.clone()));
        }

        contributions.push(contribution(factor, answer.side)?);
    }

    Ok(contributions)
}

/// Signed contribution of a single answered factor
pub fn contribution(factor: &Factor, side: Side) -> Result<Contribution, EngineError> {
    if !factor.polarity.permits(side) {
        return Err(EngineError::InvalidSide {
            factor: factor.name.clone(),
            side,
        });
    }

    let effective = if factor.adverse { side.opposite() } else { side };
    let value = match effective {
        Side::Home => factor.weight,
        Side::Away => -factor.weight,
        Side::Draw => 0.0,
    };

    Ok(Contribution {
        factor: factor.name.clone(),
        weight: factor.weight,
        value,
    })
}

/// Built-in match checklist
///
/// Fifteen directional questions; each asks which team holds the edge.
pub fn default_factors() -> Vec<Factor> {
    vec![
        Factor::new("Better results over the last 5 matches", 5.0),
        Factor::new("Higher average of goals scored", 4.0),
        Factor::new("Concedes fewer goals per match", 4.0),
        Factor::new("Keeps a consistent tactical and technical pattern", 3.0),
        Factor::new("Usually dominates possession", 3.0),
        Factor::new("Had more rest days", 3.0),
        Factor::new("Less affected by recent travel", 2.0),
        Factor::new("Plays at home with a good record", 3.0),
        Factor::new("In better physical condition (no key absences)", 4.0),
        Factor::new("Faces more important absences", 4.0).adverse(),
        Factor::new("Needs the win more (table objective)", 3.0),
        Factor::new("Favourable recent head-to-head record", 2.0),
        Factor::new("Under more external pressure (fans/press)", 2.0).adverse(),
        Factor::new("Shows more confidence (interviews/media)", 2.0),
        Factor::new("More motivated or with something at stake", 2.0),
    ]
}
