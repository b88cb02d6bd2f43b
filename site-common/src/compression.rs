use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use std::io::{self, Read, Write};

/// 魔数常量 - 用于标识目录快照格式
pub const MAGIC_BYTES: &[u8] = b"SLCAT";

/// 魔数 + 两字节版本 + 四字节原始长度
const HEADER_LEN: usize = MAGIC_BYTES.len() + 2 + 4;

/// 预分配时假定的最大压缩比
const MAX_RATIO: usize = 64;

/// 将对象序列化为二进制格式
pub fn to_binary<T: serde::Serialize>(obj: &T) -> Result<Vec<u8>, io::Error> {
    bincode::serde::encode_to_vec(obj, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("序列化失败: {}", e)))
}

/// 从二进制格式反序列化对象
pub fn from_binary<T: for<'a> serde::de::Deserialize<'a>>(data: &[u8]) -> Result<T, io::Error> {
    bincode::serde::decode_from_slice(data, bincode::config::standard())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("反序列化失败: {}", e)))
        .map(|(value, _)| value)
}

/// 将对象序列化为带文件头的 gzip 压缩格式
pub fn to_compressed<T: serde::Serialize>(obj: &T, version: [u8; 2]) -> Result<Vec<u8>, io::Error> {
    let binary = to_binary(obj)?;
    let data_len = u32::try_from(binary.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "快照超过 4GiB"))?;

    let mut output = Vec::with_capacity(HEADER_LEN + binary.len() / 2);
    output.extend_from_slice(MAGIC_BYTES);
    output.extend_from_slice(&version);
    output.extend_from_slice(&data_len.to_le_bytes());

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&binary)?;
    output.extend_from_slice(&encoder.finish()?);

    Ok(output)
}

/// 从压缩格式反序列化对象，版本主号不得超过 `max_version`
pub fn from_compressed<T: for<'a> serde::de::Deserialize<'a>>(
    data: &[u8],
    max_version: u8,
) -> Result<T, io::Error> {
    let header = read_header(data, max_version)?;

    // 头部长度不可信：预分配设上限，读取最多多读一个字节以便发现超长数据
    let capacity = header.original_size.min(data.len().saturating_mul(MAX_RATIO));
    let mut decompressed = Vec::with_capacity(capacity);
    GzDecoder::new(&data[HEADER_LEN..])
        .take(header.original_size as u64 + 1)
        .read_to_end(&mut decompressed)?;

    if decompressed.len() != header.original_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "解压后数据大小不匹配: 期望 {} 字节, 实际 {} 字节",
                header.original_size,
                decompressed.len()
            ),
        ));
    }

    from_binary(&decompressed)
}

/// 只校验文件头，返回快照版本
pub fn validate_compressed_data(data: &[u8], max_version: u8) -> Result<[u8; 2], io::Error> {
    read_header(data, max_version).map(|header| header.version)
}

struct Header {
    version: [u8; 2],
    original_size: usize,
}

fn read_header(data: &[u8], max_version: u8) -> Result<Header, io::Error> {
    if data.len() < HEADER_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("数据太短，无法解析: {} 字节", data.len()),
        ));
    }

    if &data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "无效的文件格式：魔数不匹配",
        ));
    }

    let version_offset = MAGIC_BYTES.len();
    let version = [data[version_offset], data[version_offset + 1]];
    if version[0] > max_version {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("不支持的版本: {}.{}", version[0], version[1]),
        ));
    }

    let size_offset = version_offset + 2;
    let mut size_bytes = [0u8; 4];
    size_bytes.copy_from_slice(&data[size_offset..HEADER_LEN]);

    Ok(Header {
        version,
        original_size: u32::from_le_bytes(size_bytes) as usize,
    })
}
