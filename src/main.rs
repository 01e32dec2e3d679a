use std::{path::PathBuf, process};

use morphseg::{
    core::models::Language,
    grammar::generate_cky_grammar,
    persistence::{load_model, save_model},
    preprocessing::{process_words, write_encoded_words},
    segmentation::{
        model::{build_model_from_path, LabelScheme},
        segmenter::{SegmentOptions, Segmenter},
    },
};

fn usage() -> ! {
    eprintln!("usage: morphseg <command> [args]");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  encode <wordlist> <corpus-out>");
    eprintln!("      hex-encode a word list into an inducer corpus");
    eprintln!("  build <trees> <model-out> [--labels P,S,X] [--table <path>]");
    eprintln!("      [--language <code>] [--min-length <n>]");
    eprintln!("      build a segmentation model from parse trees");
    eprintln!("  segment <model> <input> <output> [--marker <s>] [--stem-marker <s>]");
    eprintln!("      [--stemming] [--language <code>] [--min-length <n>]");
    eprintln!("      [--skip-capitalized] [--has-id]");
    eprintln!("      segment a text file with a saved model");
    eprintln!("  cky <trees> <grammar-out>");
    eprintln!("      derive a weighted CKY grammar from sampled parse trees");
    process::exit(2);
}

fn take_value(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    if pos + 1 >= args.len() {
        eprintln!("{} needs a value", flag);
        usage();
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

fn parse_language(args: &mut Vec<String>) -> Language {
    match take_value(args, "--language") {
        Some(code) => Language::from_code(&code),
        None => Language::Generic,
    }
}

fn parse_min_length(args: &mut Vec<String>) -> usize {
    match take_value(args, "--min-length") {
        Some(n) => n.parse().unwrap_or_else(|_| {
            eprintln!("--min-length needs a number, got {:?}", n);
            usage();
        }),
        None => 3,
    }
}

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        usage();
    }
    let command = args.remove(0);

    let result = match command.as_str() {
        "encode" => encode(args),
        "build" => build(args),
        "segment" => segment(args),
        "cky" => cky(args),
        _ => usage(),
    };

    if let Err(e) = result {
        eprintln!("morphseg {}: {}", command, e);
        process::exit(1);
    }
}

fn encode(args: Vec<String>) -> Result<(), morphseg::MorphsegError> {
    let [wordlist, corpus_out] = positional::<2>(args);
    let inventory = process_words(&wordlist)?;
    write_encoded_words(&inventory.encoded_words, &corpus_out)?;
    println!("Encoded {} words to: {}", inventory.encoded_words.len(), corpus_out.display());
    Ok(())
}

fn build(mut args: Vec<String>) -> Result<(), morphseg::MorphsegError> {
    let labels = take_value(&mut args, "--labels").unwrap_or_else(|| "Prefix,Stem,Suffix".into());
    let table = take_value(&mut args, "--table").map(PathBuf::from);
    let language = parse_language(&mut args);
    let min_length = parse_min_length(&mut args);

    let parts: Vec<&str> = labels.split(',').collect();
    if parts.len() != 3 {
        eprintln!("--labels needs three comma-separated nonterminals, got {:?}", labels);
        usage();
    }
    let scheme = LabelScheme::new(parts[0].trim(), parts[1].trim(), parts[2].trim())?;

    let [trees, model_out] = positional::<2>(args);
    let model = build_model_from_path(&trees, &scheme, language, min_length, table.as_deref())?;
    println!("Built model over {} words", model.word_count());
    save_model(&model, &model_out)
}

fn segment(mut args: Vec<String>) -> Result<(), morphseg::MorphsegError> {
    let mut options = SegmentOptions::default();
    if take_flag(&mut args, "--stemming") {
        options = SegmentOptions::stemming();
    }
    if let Some(marker) = take_value(&mut args, "--marker") {
        options.split_marker = Some(marker);
    }
    if let Some(marker) = take_value(&mut args, "--stem-marker") {
        options.stem_marker = Some(marker);
    }
    options.skip_nonfirst_capitalized = take_flag(&mut args, "--skip-capitalized");
    let language = parse_language(&mut args);
    options.min_word_length = parse_min_length(&mut args);
    let has_id = take_flag(&mut args, "--has-id");

    let [model_path, input, output] = positional::<3>(args);
    let model = load_model(&model_path)?;
    let segmenter = Segmenter::new(&model, options, language);
    segmenter.segment_file(&input, &output, has_id)?;
    println!("Segmented output written to: {}", output.display());
    Ok(())
}

fn cky(args: Vec<String>) -> Result<(), morphseg::MorphsegError> {
    let [trees, grammar_out] = positional::<2>(args);
    let rules = generate_cky_grammar(&trees)?;
    let mut body = rules.join("\n");
    body.push('\n');
    std::fs::write(&grammar_out, body)?;
    println!("CKY grammar written to: {}", grammar_out.display());
    Ok(())
}

fn positional<const N: usize>(args: Vec<String>) -> [PathBuf; N] {
    if args.len() != N || args.iter().any(|a| a.starts_with("--")) {
        eprintln!("expected {} paths, got {:?}", N, args);
        usage();
    }
    let mut paths = args.into_iter().map(PathBuf::from);
    std::array::from_fn(|_| paths.next().unwrap())
}
