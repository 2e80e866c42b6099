//! STL file parser for binary and ASCII formats

use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::opt,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::math::Vector3;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
///
/// An 80-byte header, a little-endian `u32` triangle count, then 50 bytes per
/// triangle: normal, three corners, and an attribute word that is ignored.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    let (rest, declared) = binary_header(data).map_err(|_| MeshError::Truncated)?;
    match (declared as usize).checked_mul(FACET_LEN) {
        Some(len) if rest.len() >= len => {}
        _ => return Err(MeshError::Truncated),
    }
    let (_, triangles) =
        count(binary_facet, declared as usize)(rest).map_err(|_| MeshError::Truncated)?;
    Ok(Mesh::from_triangles(triangles))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = binary_vector3(input)?;
    let (input, (a, b, c)) = tuple((binary_vector3, binary_vector3, binary_vector3))(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, facet(normal, [a, b, c])))
}

fn binary_vector3(input: &[u8]) -> IResult<&[u8], Vector3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Builds a triangle with the stored facet normal, or the computed one if
/// the file stores a zero normal.
fn facet(normal: Vector3, [a, b, c]: [Vector3; 3]) -> Triangle {
    let mut t = Triangle::new(
        Vertex::new(a, normal),
        Vertex::new(b, normal),
        Vertex::new(c, normal),
    );
    if normal == Vector3::zeros() {
        t.flatten_normals();
    }
    t
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, MeshError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            let consumed = input.len() - e.input.len();
            Err(MeshError::Parse {
                line: input[..consumed].matches('\n').count() + 1,
                reason: "malformed ASCII STL".into(),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(MeshError::Truncated),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(not_line_ending)(input)?;
    let (input, _) = multispace0(input)?;

    Ok((input, Mesh::from_triangles(triangles)))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, facet(normal, [v1, v2, v3])))
}

fn parse_vertex(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, Vector3> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

/// Whether the size of `data` matches the triangle count in its header.
fn is_sized_like_binary(data: &[u8]) -> bool {
    match binary_header(data) {
        Ok((rest, n)) => (n as usize).checked_mul(FACET_LEN) == Some(rest.len()),
        Err(_) => false,
    }
}

/// Detect and parse STL file (binary or ASCII)
///
/// Binary files may also start with `solid`, so text that fails to parse as
/// ASCII is retried as binary if its size fits.
pub fn parse_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) if !is_sized_like_binary(data) => return Err(e),
                Err(_) => {}
            }
        }
    }
    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(triangles: &[[[f32; 3]; 4]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for t in triangles {
            for f in t.iter().flatten() {
                data.extend_from_slice(&f.to_le_bytes());
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    const FACET: [[f32; 3]; 4] = [
        [0.0, 0.0, 2.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    #[test]
    fn test_parse_binary_header() {
        let data = binary(&[]);
        let mesh = parse_binary_stl(&data).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_parse_binary_facets() {
        let mut zero_normal = FACET;
        zero_normal[0] = [0.0; 3];
        let mesh = parse_stl(&binary(&[FACET, zero_normal])).unwrap();

        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[1].position, Vector3::new(1.0, 0.0, 0.0));
        // Stored normal kept as is
        assert_eq!(mesh.vertices[0].normal, Vector3::new(0.0, 0.0, 2.0));
        // Zero normal replaced by the face normal
        assert_eq!(mesh.vertices[3].normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = binary(&[FACET]);
        data.truncate(data.len() - 1);
        assert_eq!(parse_binary_stl(&data).unwrap_err(), MeshError::Truncated);
        assert_eq!(parse_binary_stl(&[0; 10]).unwrap_err(), MeshError::Truncated);
    }

    #[test]
    fn test_binary_with_solid_header() {
        let mut data = binary(&[FACET]);
        data[..5].copy_from_slice(b"solid");
        assert_eq!(parse_stl(&data).unwrap().triangle_count(), 1);
    }

    const ASCII: &str = "solid cube_part
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  facet normal 0 0 0
    outer loop
      vertex 0 0 0
      vertex 0 1 0
      vertex 1.5e0 0 0
    endloop
  endfacet
endsolid cube_part
";

    #[test]
    fn test_parse_ascii() {
        let mesh = parse_stl(ASCII.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices[0].normal, Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(mesh.vertices[5].position, Vector3::new(1.5, 0.0, 0.0));
        assert_eq!(mesh.vertices[5].normal, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_ascii_error_line() {
        let broken = ASCII.replace("vertex 1 0 0", "vertex 1 oops 0");
        let err = parse_stl(broken.as_bytes()).unwrap_err();
        assert!(matches!(err, MeshError::Parse { .. }), "{err}");
    }
}
