//! voice-studio CLI — 将 base64 PCM 转换为 WAV、检查 WAV 头、调用远程 TTS 合成语音
//!
//! Usage:
//!   voice-studio-cli convert <payload.b64> [--out <file>] [--rate <hz>] [--channels <n>]
//!   voice-studio-cli inspect <file.wav>
//!   voice-studio-cli synthesize <script> [--voice <v>] [--language <l>] [--emotion <e>] [--config <yaml>]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use voice_studio::codec::{self, PcmFormat, WavHeader};
use voice_studio::tts::TtsClientBuilder;
use voice_studio::{download, KeyProvider, Player, Studio, StudioConfig};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "convert" => cmd_convert(&args[2..]),
        "inspect" => cmd_inspect(&args[2..]),
        "synthesize" => cmd_synthesize(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"voice-studio-cli — 文本转语音工作室命令行工具

USAGE:
    voice-studio-cli <COMMAND> [OPTIONS]

COMMANDS:
    convert <payload.b64>       Convert a base64 PCM payload into a WAV file
        --out <file>            Output path (default: <prefix>-<timestamp>.wav)
        --rate <hz>             Sample rate of the payload (default: 24000)
        --channels <n>          Channel count of the payload (default: 1)
    inspect <file.wav>          Print the header of a canonical WAV file
    synthesize <script>         Synthesize speech and save it as WAV
        --voice <name>          Voice identifier
        --language <hint>       Language hint
        --emotion <hint>        Emotion hint
        --config <yaml>         Studio configuration file
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    GEMINI_API_KEY              API key when no host keyring is available
    VOICE_STUDIO_*              Configuration overrides (BASE_URL, MODEL, VOICE, OUTPUT_DIR, TIMEOUT_SECS)
    RUST_LOG                    Log filter"#
    );
}

fn cmd_version() {
    println!("voice-studio-cli {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn positional(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            return Some(arg.as_str());
        }
    }
    None
}

fn cmd_convert(args: &[String]) -> anyhow::Result<()> {
    let input = positional(args).ok_or_else(|| anyhow!("convert needs a payload file"))?;
    let mut format = PcmFormat::default();
    if let Some(rate) = flag_value(args, "--rate") {
        format.sample_rate = rate.parse().context("--rate must be an integer")?;
    }
    if let Some(channels) = flag_value(args, "--channels") {
        format.channel_count = channels.parse().context("--channels must be an integer")?;
    }

    let payload =
        std::fs::read_to_string(input).with_context(|| format!("cannot read {input}"))?;
    let wav = codec::pcm_base64_to_wav(payload.trim(), format)?;

    let out = match flag_value(args, "--out") {
        Some(out) => {
            let out = PathBuf::from(out);
            std::fs::write(&out, wav.as_bytes())
                .with_context(|| format!("cannot write {}", out.display()))?;
            out
        }
        None => download::save_wav(".", "speech", &wav)?,
    };
    println!("{} ({} bytes)", out.display(), wav.len());
    Ok(())
}

fn cmd_inspect(args: &[String]) -> anyhow::Result<()> {
    let input = positional(args).ok_or_else(|| anyhow!("inspect needs a WAV file"))?;
    let bytes = std::fs::read(input).with_context(|| format!("cannot read {input}"))?;
    let header = WavHeader::parse(&bytes)?;
    let duration = header.frame_count() as f64 / header.sample_rate.max(1) as f64;

    println!("File:            {input}");
    println!("Channels:        {}", header.channel_count);
    println!("Sample rate:     {} Hz", header.sample_rate);
    println!("Byte rate:       {}", header.byte_rate);
    println!("Block align:     {}", header.block_align);
    println!("Bits per sample: {}", header.bits_per_sample);
    println!("Data size:       {} bytes", header.data_len);
    println!("Frames:          {}", header.frame_count());
    println!("Duration:        {duration:.3} s");
    Ok(())
}

fn cmd_synthesize(args: &[String]) -> anyhow::Result<()> {
    let script = positional(args).ok_or_else(|| anyhow!("synthesize needs a script"))?;
    let mut config = match flag_value(args, "--config") {
        Some(path) => StudioConfig::from_file(path)?,
        None => StudioConfig::default(),
    }
    .with_env_overrides();
    if let Some(voice) = flag_value(args, "--voice") {
        config.voice = voice.to_string();
    }
    if let Some(language) = flag_value(args, "--language") {
        config.language = Some(language.to_string());
    }
    if let Some(emotion) = flag_value(args, "--emotion") {
        config.emotion = Some(emotion.to_string());
    }
    config.validate()?;

    let client = TtsClientBuilder::from_config(&config)
        .key_provider(KeyProvider::detect("gemini"))
        .build()?;
    let studio = Studio::new(Arc::new(client), Player::default(), config);
    let request = studio.request(script);

    let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
    let generation = runtime.block_on(studio.generate(&request))?;
    let path = studio.save(&generation)?;
    println!(
        "{} ({:.2} s, {} bytes)",
        path.display(),
        generation.audio.duration_secs(),
        generation.wav.len()
    );
    Ok(())
}
