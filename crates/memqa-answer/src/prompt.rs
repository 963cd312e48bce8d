//! Prompt assembly for answer synthesis.

use memqa_index::ScoredMessage;

/// Render the retrieved messages as `user_name: body` lines, one per
/// message, in retrieval (descending relevance) order.
pub fn render_context(context: &[ScoredMessage]) -> String {
    context
        .iter()
        .map(|hit| format!("{}: {}", hit.message.user_name, hit.message.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full generation prompt: instruction, delimited member
/// messages, then the question.
pub fn build_prompt(question: &str, context: &[ScoredMessage]) -> String {
    format!(
        "You are a helpful assistant answering questions about member preferences and activities.\n\
         \n\
         Answer the user's question based ONLY on the provided member messages below.\n\
         If the answer is not in the messages, clearly state that you cannot find the information.\n\
         Be concise but informative.\n\
         \n\
         --- MEMBER MESSAGES ---\n\
         {}\n\
         --- END MESSAGES ---\n\
         \n\
         Question: {}\n\
         \n\
         Answer (be specific and cite member names when relevant):",
        render_context(context),
        question
    )
}
