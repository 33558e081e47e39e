//! End-to-end tests for the `textfeat` binary.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn textfeat() -> assert_cmd::Command {
    cargo_bin_cmd!("textfeat")
}

#[test]
fn fit_then_infer_tf_word() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let corpus = tmp.path().join("corpus.txt");
    let vectorizer = tmp.path().join("tf.bin");
    fs::write(&corpus, "I love cats\nI love dogs\ncats and dogs\n").expect("write corpus");

    textfeat()
        .args(["-q", "extract", "--strategy", "tf_word", "--input"])
        .arg(&corpus)
        .arg("--vectorizer")
        .arg(&vectorizer)
        .assert()
        .success()
        .stdout("3 5 9\n");
    assert!(vectorizer.exists());

    textfeat()
        .args(["-q", "extract", "--strategy", "tf_word", "--infer", "--vectorizer"])
        .arg(&vectorizer)
        .write_stdin("cats cats\nzebra\n")
        .assert()
        .success()
        .stdout("2 5 1\n");
}

#[test]
fn infer_without_vectorizer_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    textfeat()
        .args(["-q", "extract", "--strategy", "tfidf_char", "--infer", "--vectorizer"])
        .arg(tmp.path().join("missing.bin"))
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file"));
}

#[test]
fn missing_vectorizer_path_is_a_configuration_error() {
    textfeat()
        .args(["-q", "extract", "--strategy", "tfidf_word"])
        .write_stdin("hello world\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a persistence path"));
}

#[test]
fn sequence_json_output() {
    textfeat()
        .args([
            "-q",
            "extract",
            "--strategy",
            "sequence",
            "--max-length",
            "3",
            "--format",
            "json",
        ])
        .write_stdin("b a a\nb\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rows":[[1,2,2],[0,0,1]]"#))
        .stdout(predicate::str::contains(r#""shape":[2,3]"#));
}

#[test]
fn config_file_and_fixed_vocabulary() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    let vocab = tmp.path().join("vocab.json");
    fs::write(
        &config,
        format!(
            r#"{{"strategy": "tfidf_word", "persistence_path": {:?}}}"#,
            tmp.path().join("word.bin")
        ),
    )
    .expect("write config");
    fs::write(&vocab, r#"{"cats": 0, "dogs": 1, "birds": 2}"#).expect("write vocab");

    textfeat()
        .args(["-q", "extract", "--config"])
        .arg(&config)
        .arg("--vocab")
        .arg(&vocab)
        .write_stdin("cats and dogs\nnothing here\n")
        .assert()
        .success()
        .stdout("2 3 2\n");
}

#[test]
fn filter_stop_words_uses_list_from_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    let stop_words = tmp.path().join("stop_words.txt");
    fs::write(&stop_words, "the\nand\n").expect("write stop words");
    fs::write(
        &config,
        format!(
            r#"{{"strategy": "tf_word", "persistence_path": {:?}, "resources": {{"stop_words": {:?}}}}}"#,
            tmp.path().join("tf.bin"),
            stop_words
        ),
    )
    .expect("write config");

    textfeat()
        .args(["-q", "extract", "--filter-stop-words", "--config"])
        .arg(&config)
        .write_stdin("the cats and the dogs\n")
        .assert()
        .success()
        .stdout("1 2 2\n");

    fs::remove_file(&stop_words).expect("remove stop words");
    textfeat()
        .args(["-q", "extract", "--filter-stop-words", "--config"])
        .arg(&config)
        .write_stdin("the cats and the dogs\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such file"));
}

#[test]
fn labels_are_encoded_in_sorted_order() {
    textfeat()
        .args(["labels"])
        .write_stdin("spam\nham\nspam\n")
        .assert()
        .success()
        .stdout("[1,0,1]\n");
}
