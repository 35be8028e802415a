// Prompt templates for the NL-to-SQL assistant.

/// Instruction template shared by the agent prefix and the direct-completion
/// fallback. Placeholders: `{schema}`, `{input}`.
pub const SQL_INSTRUCTION_TEMPLATE: &str = r#"
You are an intelligent assistant that translates natural language into correct SQL queries.
- Always use correct SQL syntax.
- Use only the provided tables and columns.
- Do not use any table or column that is not listed in the schema.
- If the user refers to something not in the schema, ignore it.
- Only use the tables: Users, Posts, Comments.
- Return ONLY the SQL query, nothing else.
- Do not explain or add commentary.
- Do NOT use code blocks or markdown formatting. Output only plain SQL.

NOTE : Give the SQL Query directly without any special characters like '```' and avoid duplicate queries

Go through user question carefully and generate the correct SQL query.

Schema:
{schema}

User Question: {input}
SQL Query:
"#;

/// Placeholder: `{query}`.
pub const QUERY_EXPLAINER_TEMPLATE: &str = r#"
You are a helpful assistant who clarifies vague or subjective natural language database queries.

Given the query:
"{query}"

1. Identify and explain any ambiguous or subjective terms (e.g., "popular", "negative", "recent").
2. Suggest how they could be interpreted in terms of the schema (Users, Posts, Comments).
3. Rephrase the query in a more precise way to help an LLM generate SQL.

Response:
"#;

/// Placeholder: `{query}`.
pub const QUERY_CHECKER_TEMPLATE: &str = r#"
{query}
Double check the SQLite query above for common mistakes, including:
- Using NOT IN with NULL values
- Using UNION when UNION ALL should have been used
- Using BETWEEN for exclusive ranges
- Data type mismatch in predicates
- Properly quoting identifiers
- Using the correct number of arguments for functions
- Casting to the correct data type
- Using the proper columns for joins

If there are any of the above mistakes, rewrite the query. If there are no mistakes, just reproduce the original query.

Output the final SQL query only.

SQL Query: "#;

/// Placeholders: `{tool_names}`.
pub const REACT_FORMAT_INSTRUCTIONS: &str = r#"Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final SQL query that answers the original input question"#;

/// Placeholders: `{input}`, `{scratchpad}`.
pub const REACT_SUFFIX: &str = r#"Begin!

Question: {input}
Thought:{scratchpad}"#;

/// Fills `{name}` placeholders in one pass over `template`. Inserted values
/// are never scanned again, so placeholder-like text in them stays as is.
/// Braces that do not open a known placeholder are copied through.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let filled = values.iter().find_map(|(name, value)| {
            tail.strip_prefix(*name)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match filled {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn build_sql_prompt(schema: &str, question: &str) -> String {
    fill_template(
        SQL_INSTRUCTION_TEMPLATE,
        &[("schema", schema), ("input", question)],
    )
}

pub fn build_explainer_prompt(question: &str) -> String {
    fill_template(QUERY_EXPLAINER_TEMPLATE, &[("query", question)])
}

pub fn build_checker_prompt(query: &str) -> String {
    fill_template(QUERY_CHECKER_TEMPLATE, &[("query", query)])
}

/// Full ReAct prompt: instruction prefix, tool descriptions, format
/// instructions, then the question and the steps taken so far.
pub fn build_react_prompt(
    schema: &str,
    question: &str,
    tools: &[(&str, &str)],
    scratchpad: &str,
) -> String {
    let prefix = build_sql_prompt(schema, question);
    let descriptions: Vec<String> = tools
        .iter()
        .map(|(name, description)| format!("{name}: {description}"))
        .collect();
    let names: Vec<&str> = tools.iter().map(|(name, _)| *name).collect();
    let tool_names = names.join(", ");

    format!(
        "{prefix}\n\n{}\n\n{}\n\n{}",
        descriptions.join("\n"),
        fill_template(
            REACT_FORMAT_INSTRUCTIONS,
            &[("tool_names", tool_names.as_str())]
        ),
        fill_template(
            REACT_SUFFIX,
            &[("input", question), ("scratchpad", scratchpad)]
        ),
    )
}
