//! GraphQL documents for the Note model, matching the generated Amplify operations.

pub const LIST_NOTES: &str = r#"query ListNotes($filter: ModelNoteFilterInput, $limit: Int, $nextToken: String) {
  listNotes(filter: $filter, limit: $limit, nextToken: $nextToken) {
    items {
      id
      name
      description
      bloodLevel
      createdAt
      updatedAt
    }
    nextToken
  }
}"#;

pub const CREATE_NOTE: &str = r#"mutation CreateNote($input: CreateNoteInput!, $condition: ModelNoteConditionInput) {
  createNote(input: $input, condition: $condition) {
    id
    name
    description
    bloodLevel
    createdAt
    updatedAt
  }
}"#;

pub const DELETE_NOTE: &str = r#"mutation DeleteNote($input: DeleteNoteInput!, $condition: ModelNoteConditionInput) {
  deleteNote(input: $input, condition: $condition) {
    id
    name
    description
    bloodLevel
    createdAt
    updatedAt
  }
}"#;
