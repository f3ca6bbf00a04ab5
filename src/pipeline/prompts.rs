//! System prompts for the classification and generation stages.

/// Tables a caller may write to through the mutation path.
pub const WRITABLE_SCHEMA: &str = r#"create table "user" ("id" serial primary key, "created_at" timestamptz(0) not null, "updated_at" timestamptz(0) not null, "email" varchar(255) not null, "password" varchar(255) not null, "first_name" varchar(255) not null, "last_name" varchar(255) not null, "is_admin" bool not null, "photo" bytea null, "company" varchar(255) not null, "card_number" varchar(255) not null, "phone_number" varchar(255) not null, "is_basic" bool not null);

create table "testimonial" ("id" serial primary key, "created_at" timestamptz(0) not null, "updated_at" timestamptz(0) not null, "name" varchar(255) not null, "title" varchar(255) not null, "message" varchar(255) not null);"#;

/// The product catalog searched by the retrieval path.
pub const CATALOG_SCHEMA: &str = r#"create table "product" (
  "id" serial primary key,
  "created_at" timestamptz(0) not null default now(),
  "category" varchar(255) not null,
  "photo_url" varchar(255) not null,
  "name" varchar(255) not null,
  "description" varchar(255) null,
  "views_count" int DEFAULT 0
);"#;

pub const SYSTEM_PROMPT_FOR_CLASSIFICATION: &str = r#"You are an assistant for a crystal catalog and management app.

Classify the user's message into one of four categories:
1. "action": If the message is a request for a database action or query. Examples include creating testimonials or taking account actions.
2. "retrieve": If the message involves searching for crystals or products.
3. "general": If the message is a general question or prompt about crystals, or related to breaking bad, or introductory messages like "hello" or "what can you help me with".
4. "irrelevant": If the message is unrelated to crystals or supported actions.

Respond only with the classification: "action", "retrieve", "general", or "irrelevant"."#;

const OUTPUT_RULES: &str = "Output only the SQL query as plain text without any formatting, explanations, or additional characters (e.g., no backticks, no markdown, no code comments). Your response should be a valid SQL query ready for execution.";

pub const SYSTEM_PROMPT_FOR_MUTATION: &str = r#"You are a helpful assistant that generates SQL queries. The schema includes these entities:

{schema}

The user's id is {user_id}
Generate SQL commands for actions like creating a testimonial or updating a user record.
{output_rules}"#;

pub const SYSTEM_PROMPT_FOR_RETRIEVAL: &str = r#"You are a helpful assistant that generates SQL queries. The schema includes the following entity:

{schema}

Generate a SELECT query to retrieve the `name`, `description`, and `photo_url` of products where any of the identified keywords from the user's input match either the `category` or `description` fields.

1. Extract keywords from the user input that are relevant to the query.
2. Use `ILIKE` conditions to match any of these keywords against the `category` or `description` fields.
3. Combine the conditions using `OR` to ensure a match for any keyword.

{output_rules}"#;

pub const SYSTEM_PROMPT_FOR_CONVERSATION: &str = "You are a knowledgeable assistant specializing in crystals. Respond to the user message with concise, engaging, and informative answers about crystals. Keep the response relevant and simple.";

pub fn mutation_prompt(user_id: &str) -> String {
    SYSTEM_PROMPT_FOR_MUTATION
        .replace("{schema}", WRITABLE_SCHEMA)
        .replace("{output_rules}", OUTPUT_RULES)
        .replace("{user_id}", user_id)
}

pub fn retrieval_prompt() -> String {
    SYSTEM_PROMPT_FOR_RETRIEVAL
        .replace("{schema}", CATALOG_SCHEMA)
        .replace("{output_rules}", OUTPUT_RULES)
}
