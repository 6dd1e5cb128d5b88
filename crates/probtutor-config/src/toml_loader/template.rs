//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# ProbTutor Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# The API key is read from OPENAI_API_KEY (or a .env file), never from here.

[assistant]
# name = "ProbTutor"
# model = "gpt-4o"
# code_interpreter = true
# assistant_id = "asst_..."     # reuse an existing assistant
# api_base = "https://api.openai.com/v1"
# request_timeout_secs = 120    # 5-600

[polling]
# interval_ms = 2000            # first sleep between status fetches
# max_wait_secs = 60            # local give-up; the remote run keeps going
# backoff_factor = 1.0          # 1.0 = fixed interval, 1.0-4.0
# max_interval_ms = 10000
# requires_action = "wait"      # wait, fail_fast

[history]
# max_entries = 50              # even number, user/assistant pairs

[console]
# min_input_chars = 3
# max_input_chars = 1000
# image_dir = "probtutor-images"
# show_progress = true

[docqa]
# document = "lecture.txt"      # text export, pages separated by form feeds
# chunk_size = 1000
# chunk_overlap = 100
# top_k = 4
# ollama_url = "http://localhost:11434"
# embedding_model = "all-minilm"
# chat_model = "gemma3:4b"
# normalize_embeddings = true

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
}
