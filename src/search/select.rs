use std::collections::HashSet;

use crate::search::Candidate;

/// Position of the first largest value.
pub fn first_max(values: impl IntoIterator<Item = usize>) -> Option<usize> {
    values
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, v)| match best {
            Some((_, top)) if v <= top => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Two-phase greedy pick within one hemisphere.
///
/// The first site is the candidate seeing the most samples. The second is
/// the candidate seeing the most samples the first one does not, chosen
/// from the list with the first site taken out. Returns indices into
/// `candidates`: none for an empty hemisphere, one when it has a single
/// candidate.
pub fn select_sites(candidates: &[Candidate]) -> Vec<usize> {
    let Some(winner) = first_max(candidates.iter().map(Candidate::visible_count)) else {
        return Vec::new();
    };
    let covered: HashSet<usize> = candidates[winner].visible.iter().copied().collect();

    let remaining = candidates
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != winner)
        .map(|(_, c)| c.visible.iter().filter(|i| !covered.contains(i)).count());

    match first_max(remaining) {
        Some(index) => {
            // the winner was taken out ahead of anything at or past its slot
            let runner_up = if index >= winner { index + 1 } else { index };
            vec![winner, runner_up]
        }
        None => vec![winner],
    }
}
