use thiserror::Error;

/// Represents errors raised while rescaling branch lengths in a tree text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NewickError {
    #[error("Branch-length token '{token}' at byte {offset} is not a number")]
    InvalidBranchLength { offset: usize, token: String },
}

/// Multiplies every branch length in a Newick-style tree text by `ratio`.
///
/// A branch length is the token following a `:`, terminated by `,`, `)`, `;`,
/// or the end of the text. The scan is a single left-to-right pass; all bytes
/// outside the numeric tokens (topology, labels, delimiters, whitespace) are
/// preserved exactly. Scaled lengths are re-serialized in Rust's shortest
/// round-trip decimal form, so rescaling by 1.0 returns plain-decimal input
/// unchanged.
///
/// Repeated rescaling does not compose textually: rescaling by `r` twice is
/// only guaranteed to equal rescaling by `r²` when the second pass is applied
/// to the *original* text, since each pass re-serializes the numbers.
///
/// # Errors
///
/// Returns [`NewickError::InvalidBranchLength`] if a token following `:`
/// cannot be parsed as a number, identifying its byte offset.
pub fn rescale_branch_lengths(tree: &str, ratio: f64) -> Result<String, NewickError> {
    let mut output = String::with_capacity(tree.len());
    let mut rest = tree;
    let mut offset = 0;

    while let Some(colon) = rest.find(':') {
        output.push_str(&rest[..=colon]);

        let after = &rest[colon + 1..];
        let token_len = after
            .find([',', ')', ';'])
            .unwrap_or(after.len());
        let token = &after[..token_len];

        let length: f64 = token
            .parse()
            .map_err(|_| NewickError::InvalidBranchLength {
                offset: offset + colon + 1,
                token: token.to_string(),
            })?;
        output.push_str(&format!("{}", length * ratio));

        offset += colon + 1 + token_len;
        rest = &after[token_len..];
    }
    output.push_str(rest);

    Ok(output)
}
