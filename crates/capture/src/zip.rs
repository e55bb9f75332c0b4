/// Walks two trees in lockstep and returns the node pairs in pre-order.
///
/// Children are paired by position. When one side has more children than
/// the other, the unmatched subtrees are skipped.
pub fn zip_trees<S, T>(
    source: S,
    target: T,
    source_children: impl Fn(&S) -> Vec<S>,
    target_children: impl Fn(&T) -> Vec<T>,
) -> Vec<(S, T)> {
    let mut pairs = Vec::new();
    let mut stack = vec![(source, target)];

    while let Some((s, t)) = stack.pop() {
        let children: Vec<(S, T)> = source_children(&s)
            .into_iter()
            .zip(target_children(&t))
            .collect();
        // Reversed so the first child is visited next.
        stack.extend(children.into_iter().rev());
        pairs.push((s, t));
    }

    pairs
}
